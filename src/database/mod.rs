//! Document collections keyed by opaque, store-assigned ids.

pub mod assert;
pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use anyhow::{bail, Context};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::AppError;

pub use self::{memory::MemoryStore, sqlite::SqliteStore};

pub type Fields = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Appointments,
    Doctors,
    Users,
    VoiceEvaluations,
    Sessions,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Appointments => "appointments",
            Collection::Doctors => "doctors",
            Collection::Users => "users",
            Collection::VoiceEvaluations => "voiceEvaluations",
            Collection::Sessions => "sessions",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// The hosted-database capability the service consumes. Writes are
/// last-write-wins per document; nothing here locks across calls.
pub trait RecordStore: Send + Sync {
    /// Every document in the collection, in insertion order.
    fn list_all(&self, collection: Collection) -> anyhow::Result<Vec<Document>>;

    fn get(&self, collection: Collection, id: &str) -> anyhow::Result<Option<Document>>;

    /// Stores a new document and returns its id.
    fn insert(&self, collection: Collection, fields: Fields) -> anyhow::Result<String>;

    /// Shallow-merges `partial` into an existing document.
    fn update(&self, collection: Collection, id: &str, partial: Fields) -> anyhow::Result<()>;

    /// Removing a missing document is not an error.
    fn delete(&self, collection: Collection, id: &str) -> anyhow::Result<()>;
}

/// Runs `f` against the store on the blocking pool.
pub async fn run<T, F>(store: &Arc<dyn RecordStore>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&dyn RecordStore) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    crate::utils::blocking(move || f(store.as_ref())).await
}

/// Typed view of a document. The id is exposed as an `id` field.
pub fn decode<T: DeserializeOwned>(doc: Document) -> anyhow::Result<T> {
    let Document { id, mut fields } = doc;
    fields.insert("id".to_string(), Value::String(id.clone()));
    serde_json::from_value(Value::Object(fields))
        .with_context(|| format!("Malformed document {}", id))
}

/// Field map for a typed value. Any `id` field is dropped; ids belong to the store.
pub fn encode<T: Serialize>(value: &T) -> anyhow::Result<Fields> {
    match serde_json::to_value(value).context("Encode error")? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        _ => bail!("Documents must be objects"),
    }
}

pub fn list<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: Collection,
) -> anyhow::Result<Vec<T>> {
    store
        .list_all(collection)?
        .into_iter()
        .map(decode)
        .collect()
}

pub fn fetch<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: Collection,
    id: &str,
) -> anyhow::Result<Option<T>> {
    store.get(collection, id)?.map(decode).transpose()
}
