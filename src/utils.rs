#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    state: web::Data<AppState>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](state, info).await {
                        Ok(response) => response,
                        Err(err) => {
                            err.log(stringify!($func_name));
                            <$response>::err(err.user_message())
                        }
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

/// Same shape as `post_funcs!`, for raw-body uploads whose metadata rides in
/// the query string.
#[macro_export]
macro_rules! upload_funcs {
    ( $( ( $func_name:ident, $url:expr, $query:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    state: web::Data<AppState>,
                    query: web::Query<$query>,
                    body: web::Bytes
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](state, query, body).await {
                        Ok(response) => response,
                        Err(err) => {
                            err.log(stringify!($func_name));
                            <$response>::err(err.user_message())
                        }
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

use actix_web::web;
use anyhow::Context;
use blake2::{Blake2b512, Digest};
use chrono::{NaiveDate, Utc};

use crate::error::AppError;

/// Runs store or filesystem work on the blocking pool.
pub async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let res = web::block(f).await.context("blocking pool")?;
    Ok(res?)
}

pub fn new_salt() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Blake2b512::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn today_str() -> String {
    format_date(&Utc::now().date_naive())
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Rounds to two decimals, the precision scores are shown with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
