use std::{env, path::PathBuf};

use anyhow::Context;

/// Runtime settings, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file path, or `:memory:` for a throwaway in-process store.
    pub database_url: String,
    pub bind: String,
    pub blob_root: PathBuf,
    /// Route the blob root is served under.
    pub blob_mount: String,
    /// Prefix of the URLs handed out for stored blobs.
    pub blob_base_url: String,
    pub session_ttl_secs: i64,
    pub max_upload_bytes: usize,
    pub seed_supervisor: Option<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "callcenter.db".to_string(),
            bind: "127.0.0.1:8080".to_string(),
            blob_root: PathBuf::from("blobs"),
            blob_mount: "/files".to_string(),
            blob_base_url: "/files".to_string(),
            session_ttl_secs: 3600,
            max_upload_bytes: 16 * 1024 * 1024,
            seed_supervisor: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let blob_mount = env::var("BLOB_MOUNT").unwrap_or(defaults.blob_mount);
        let blob_base_url = env::var("BLOB_BASE_URL").unwrap_or_else(|_| blob_mount.clone());

        let session_ttl_secs = match env::var("SESSION_TTL_SECS") {
            Ok(v) => v.parse().context("SESSION_TTL_SECS must be an integer")?,
            Err(_) => defaults.session_ttl_secs,
        };
        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(v) => v.parse().context("MAX_UPLOAD_BYTES must be an integer")?,
            Err(_) => defaults.max_upload_bytes,
        };

        let seed_supervisor = match (
            env::var("SEED_SUPERVISOR_EMAIL"),
            env::var("SEED_SUPERVISOR_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind: env::var("BIND_ADDR").unwrap_or(defaults.bind),
            blob_root: env::var("BLOB_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.blob_root),
            blob_mount,
            blob_base_url,
            session_ttl_secs,
            max_upload_bytes,
            seed_supervisor,
        })
    }
}
