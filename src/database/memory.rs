use std::collections::HashMap;

use anyhow::bail;
use parking_lot::RwLock;

use super::{Collection, Document, Fields, RecordStore};

/// Process-local store. Used for `DATABASE_URL=:memory:` and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn list_all(&self, collection: Collection) -> anyhow::Result<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    fn get(&self, collection: Collection, id: &str) -> anyhow::Result<Option<Document>> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    fn insert(&self, collection: Collection, fields: Fields) -> anyhow::Result<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        Ok(id)
    }

    fn update(&self, collection: Collection, id: &str, partial: Fields) -> anyhow::Result<()> {
        let mut guard = self.collections.write();
        let doc = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id));
        match doc {
            Some(doc) => {
                doc.fields.extend(partial);
                Ok(())
            }
            None => bail!("No document {} in {}", id, collection.as_str()),
        }
    }

    fn delete(&self, collection: Collection, id: &str) -> anyhow::Result<()> {
        if let Some(docs) = self.collections.write().get_mut(&collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}
