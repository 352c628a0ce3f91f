use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

use super::{join_url, BlobStore};

/// Blobs as files under a root directory that the server also serves
/// statically under `base_url`.
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    pub fn new<P: AsRef<Path>>(root: P, base_url: &str) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create blob root {}", root.display()))?;
        Ok(Self {
            root,
            base_url: base_url.to_string(),
        })
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, path: &str, bytes: &[u8]) -> anyhow::Result<String> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).context("Blob directory")?;
        }
        fs::write(&target, bytes)
            .with_context(|| format!("Failed to write blob {}", path))?;
        tracing::info!(path, size = bytes.len(), "stored blob");
        Ok(join_url(&self.base_url, path))
    }

    fn list(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let dir = self.root.join(prefix);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).context("Blob listing")? {
            let entry = entry.context("Blob listing")?;
            if entry.file_type().context("Blob listing")?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        Ok(names
            .into_iter()
            .map(|name| join_url(&self.base_url, &format!("{}/{}", prefix, name)))
            .collect())
    }
}
