mod auth;
mod blob;
mod booking;
mod config;
mod database;
mod error;
mod gate;
mod models;
mod protocol;
mod reconcile;
mod schema;
mod spreadsheet;
mod state;
mod supervisor;
mod utils;

use std::sync::Arc;

use actix_files::Files;
use actix_web::{middleware, rt, web, App, HttpServer};
use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use crate::{
    auth::{accounts::seed_supervisor, SessionEvent},
    blob::{BlobStore, FsBlobStore},
    config::Config,
    database::{MemoryStore, RecordStore, SqliteStore},
    state::AppState,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn RecordStore> = if config.database_url == ":memory:" {
        tracing::warn!("using in-memory record store, nothing will persist");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(SqliteStore::connect(&config.database_url)?)
    };
    let blobs: Arc<dyn BlobStore> =
        Arc::new(FsBlobStore::new(&config.blob_root, &config.blob_base_url)?);

    if let Some((email, password)) = &config.seed_supervisor {
        seed_supervisor(store.as_ref(), email, password).context("seeding supervisor")?;
    }

    let state = AppState::new(store, blobs, &config);

    let mut events = state.auth.subscribe();
    rt::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedIn { uid }) => tracing::info!(%uid, "signed in"),
                Ok(SessionEvent::SignedOut { uid }) => tracing::info!(%uid, "signed out"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session events dropped")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    tracing::info!("listening on http://{}", config.bind);

    let bind = config.bind.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::new(config.max_upload_bytes))
            .wrap(middleware::Logger::default())
            .service(Files::new(&config.blob_mount, config.blob_root.clone()))
            // sign-in and routing
            .service(web::scope("/auth").configure(auth::config))
            // receptionists
            .service(web::scope("/booking").configure(booking::config))
            // supervisors
            .service(web::scope("/supervisor").configure(supervisor::config))
    })
    .bind(&bind)?
    .run()
    .await?;

    Ok(())
}
