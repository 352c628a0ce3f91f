use serde::Serialize;

use crate::gate::{Role, Section};

#[derive(Default, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub err: String,
    pub login_token: String,
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub role: Option<Role>,
    pub home: Option<Section>,
}

#[derive(Default, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub err: String,
    pub signed_in: bool,
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub role: Option<Role>,
    pub home: Option<Section>,
}

#[derive(Default, Serialize)]
pub struct RouteResponse {
    pub success: bool,
    pub err: String,
    pub allowed: bool,
    pub redirect: Option<Section>,
}

crate::impl_err_response! {
    LoginResponse,
    SessionResponse,
    RouteResponse,
}
