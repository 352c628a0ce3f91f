//! Opaque byte blobs addressed by slash-separated paths.

mod fs;
#[cfg(test)]
mod memory;

pub use self::fs::FsBlobStore;
#[cfg(test)]
pub use self::memory::MemoryBlobStore;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::AppError;

pub const SHEET_PREFIX: &str = "excelUploads";
pub const DOCUMENT_PREFIX: &str = "documents";
pub const VOICE_PREFIX: &str = "voiceCalls";

pub trait BlobStore: Send + Sync {
    /// Stores `bytes` at `path`, replacing any previous blob, and returns its URL.
    fn put(&self, path: &str, bytes: &[u8]) -> anyhow::Result<String>;

    /// URLs of the blobs directly under `prefix`, sorted by path.
    fn list(&self, prefix: &str) -> anyhow::Result<Vec<String>>;
}

/// Joins path segments, rejecting anything that could escape its prefix.
pub fn blob_path(segments: &[&str]) -> Result<String, AppError> {
    for segment in segments {
        if segment.is_empty()
            || *segment == "."
            || *segment == ".."
            || segment.contains(['/', '\\', '\0'])
        {
            return Err(AppError::validation("Invalid file name."));
        }
    }
    Ok(segments.join("/"))
}

/// Bytes escaped in blob URLs: everything but unreserved characters and `/`.
const PATH_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

pub(crate) fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_ESCAPES).to_string()
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), encode_path(path))
}
