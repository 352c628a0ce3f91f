pub mod accounts;
mod requests;
mod responses;
mod sessions;
pub mod utils;

pub use self::sessions::{AuthService, SessionEvent};

use crate::{
    error::AppError,
    gate::{self, home_section, Access},
    protocol::SimpleResponse,
    utils::blocking,
    AppState,
};
use actix_web::{post, web, HttpResponse, Responder};

use self::{requests::*, responses::*, utils::session_context};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(session)
        .service(route);
}

crate::post_funcs! {
    (login, "/login", LoginRequest, LoginResponse),
    (logout, "/logout", LogoutRequest, SimpleResponse),
    (session, "/session", SessionRequest, SessionResponse),
    (route, "/route", RouteRequest, RouteResponse),
}

async fn login_impl(
    state: web::Data<AppState>,
    info: web::Json<LoginRequest>,
) -> Result<LoginResponse, AppError> {
    let info = info.into_inner();
    if info.email.trim().is_empty() || info.password.is_empty() {
        return Err(AppError::validation("Please fill all required fields."));
    }

    let auth = state.auth.clone();
    let (login_token, principal) =
        blocking(move || auth.sign_in(&info.email, &info.password)).await?;

    Ok(LoginResponse {
        success: true,
        err: "".to_string(),
        login_token,
        home: home_section(principal.role),
        uid: principal.uid,
        display_name: principal.display_name,
        email: principal.email,
        role: principal.role,
    })
}

async fn logout_impl(
    state: web::Data<AppState>,
    info: web::Json<LogoutRequest>,
) -> Result<SimpleResponse, AppError> {
    let auth = state.auth.clone();
    let token = info.into_inner().login_token;
    blocking(move || auth.sign_out(&token)).await?;

    Ok(SimpleResponse::ok())
}

async fn session_impl(
    state: web::Data<AppState>,
    info: web::Json<SessionRequest>,
) -> Result<SessionResponse, AppError> {
    let ctx = session_context(&state, &info.login_token).await?;

    let mut res = SessionResponse {
        success: true,
        ..Default::default()
    };
    if let Some(principal) = ctx.principal() {
        res.signed_in = true;
        res.uid = principal.uid.clone();
        res.display_name = principal.display_name.clone();
        res.email = principal.email.clone();
        res.role = principal.role;
        res.home = home_section(principal.role);
    }
    Ok(res)
}

async fn route_impl(
    state: web::Data<AppState>,
    info: web::Json<RouteRequest>,
) -> Result<RouteResponse, AppError> {
    let ctx = session_context(&state, &info.login_token).await?;

    let (allowed, redirect) = match gate::authorize(&ctx, info.section) {
        Access::Allow => (true, None),
        Access::Redirect(section) => (false, Some(section)),
        Access::Deny => (false, None),
    };
    Ok(RouteResponse {
        success: true,
        err: "".to_string(),
        allowed,
        redirect,
    })
}
