use std::sync::Arc;

use crate::{
    auth::AuthService,
    blob::BlobStore,
    config::Config,
    database::RecordStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>, config: &Config) -> Self {
        let auth = AuthService::new(Arc::clone(&store), config.session_ttl_secs);
        Self { store, blobs, auth }
    }
}
