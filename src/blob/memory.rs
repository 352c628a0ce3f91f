use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::{join_url, BlobStore};

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    base_url: String,
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            blobs: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.lock().get(path).cloned()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, path: &str, bytes: &[u8]) -> anyhow::Result<String> {
        self.blobs.lock().insert(path.to_string(), bytes.to_vec());
        Ok(join_url(&self.base_url, path))
    }

    fn list(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let dir = format!("{}/", prefix);
        Ok(self
            .blobs
            .lock()
            .keys()
            .filter(|path| {
                path.strip_prefix(&dir)
                    .map_or(false, |rest| !rest.contains('/'))
            })
            .map(|path| join_url(&self.base_url, path))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_direct_children_only() {
        let store = MemoryBlobStore::new("/files");
        store.put("documents/u1/a.pdf", b"1").unwrap();
        store.put("documents/u2/b.pdf", b"2").unwrap();
        assert_eq!(
            store.list("documents/u1").unwrap(),
            vec!["/files/documents/u1/a.pdf"]
        );
        assert!(store.list("documents").unwrap().is_empty());
        assert_eq!(store.bytes("documents/u2/b.pdf").unwrap(), b"2");
    }
}
