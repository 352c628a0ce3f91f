use actix_web::web;

use crate::{error::AppError, gate::SessionContext, utils::blocking, AppState};

pub async fn session_context(
    state: &web::Data<AppState>,
    token: &str,
) -> Result<SessionContext, AppError> {
    let auth = state.auth.clone();
    let token = token.to_string();
    blocking(move || auth.resolve(&token)).await
}
