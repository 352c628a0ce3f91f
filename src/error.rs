use crate::{gate::Section, spreadsheet::ImportError};

/// Failure of a single user action. Every variant is reported back to the
/// caller as `{ success: false, err }` and never tears the service down.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Form input rejected before any store call.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(&'static str),

    /// Uploaded spreadsheet could not be read.
    #[error(transparent)]
    Parse(#[from] ImportError),

    #[error("Please sign in.")]
    Unauthenticated,

    #[error("Access denied.")]
    Forbidden { redirect: Option<Section> },

    /// Record or blob store failure. Detail is logged, not shown.
    #[error(transparent)]
    Store(anyhow::Error),
}

impl AppError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        AppError::Validation(msg.into())
    }

    /// The message a user sees for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Store(_) => "Error occurred.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn log(&self, op: &str) {
        match self {
            AppError::Store(err) => tracing::error!(op, "store failure: {:#}", err),
            AppError::Parse(err) => tracing::warn!(op, "import failed: {}", err),
            other => tracing::debug!(op, "rejected: {}", other),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AppError>() {
            Ok(app) => app,
            Err(err) => match err.downcast::<ImportError>() {
                Ok(import) => AppError::Parse(import),
                Err(err) => AppError::Store(err),
            },
        }
    }
}
