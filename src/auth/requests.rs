use serde::Deserialize;

use crate::gate::Section;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct RouteRequest {
    #[serde(default)]
    pub login_token: String,
    pub section: Section,
}
