use anyhow::{bail, Context};
use chrono::{NaiveDateTime, Utc};
use diesel::{
    connection::SimpleConnection,
    prelude::*,
    r2d2::{ConnectionManager, CustomizeConnection},
    SqliteConnection,
};
use r2d2::PooledConnection;

use super::{Collection, Document, Fields, RecordStore};
use crate::schema::documents;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const CREATE_DOCUMENTS: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL,
    PRIMARY KEY (collection, id)
)";

#[derive(Queryable, Insertable)]
#[diesel(table_name = documents)]
struct DocumentRow {
    collection: String,
    id: String,
    body: String,
    created_at: NaiveDateTime,
}

impl DocumentRow {
    fn into_document(self) -> anyhow::Result<Document> {
        let fields: Fields = serde_json::from_str(&self.body)
            .with_context(|| format!("Corrupt body for {}/{}", self.collection, self.id))?;
        Ok(Document {
            id: self.id,
            fields,
        })
    }
}

#[derive(Debug)]
struct BusyTimeout;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for BusyTimeout {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Documents kept as JSON bodies in a single SQLite table.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn connect(database_url: &str) -> anyhow::Result<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = r2d2::Pool::builder()
            .connection_customizer(Box::new(BusyTimeout))
            .build(manager)
            .context("Failed to create pool")?;

        let store = Self { pool };
        let mut conn = store.conn()?;
        diesel::sql_query(CREATE_DOCUMENTS)
            .execute(&mut conn)
            .context("DB error")?;
        Ok(store)
    }

    fn conn(&self) -> anyhow::Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
        self.pool.get().context("DB connection")
    }
}

impl RecordStore for SqliteStore {
    fn list_all(&self, collection: Collection) -> anyhow::Result<Vec<Document>> {
        let mut conn = self.conn()?;
        let rows = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .order((documents::created_at.asc(), documents::id.asc()))
            .load::<DocumentRow>(&mut conn)
            .context("DB error")?;
        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    fn get(&self, collection: Collection, id: &str) -> anyhow::Result<Option<Document>> {
        let mut conn = self.conn()?;
        documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .filter(documents::id.eq(id))
            .first::<DocumentRow>(&mut conn)
            .optional()
            .context("DB error")?
            .map(DocumentRow::into_document)
            .transpose()
    }

    fn insert(&self, collection: Collection, fields: Fields) -> anyhow::Result<String> {
        let mut conn = self.conn()?;
        let row = DocumentRow {
            collection: collection.as_str().to_string(),
            id: uuid::Uuid::new_v4().simple().to_string(),
            body: serde_json::to_string(&fields).context("Encode error")?,
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(documents::table)
            .values(&row)
            .execute(&mut conn)
            .context("DB error")?;
        Ok(row.id)
    }

    fn update(&self, collection: Collection, id: &str, partial: Fields) -> anyhow::Result<()> {
        let mut conn = self.conn()?;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            let row = documents::table
                .filter(documents::collection.eq(collection.as_str()))
                .filter(documents::id.eq(id))
                .first::<DocumentRow>(conn)
                .optional()
                .context("DB error")?;
            let mut doc = match row {
                Some(row) => row.into_document()?,
                None => bail!("No document {} in {}", id, collection.as_str()),
            };
            doc.fields.extend(partial);

            let body = serde_json::to_string(&doc.fields).context("Encode error")?;
            diesel::update(
                documents::table
                    .filter(documents::collection.eq(collection.as_str()))
                    .filter(documents::id.eq(id)),
            )
            .set(documents::body.eq(body))
            .execute(conn)
            .context("DB error")?;
            Ok(())
        })
    }

    fn delete(&self, collection: Collection, id: &str) -> anyhow::Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(
            documents::table
                .filter(documents::collection.eq(collection.as_str()))
                .filter(documents::id.eq(id)),
        )
        .execute(&mut conn)
        .context("DB error")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = SqliteStore::connect(path.to_str().unwrap()).unwrap();
        (dir, store)
    }

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn documents_round_trip() {
        let (_dir, store) = store();
        let id = store
            .insert(
                Collection::Appointments,
                fields(&[("patientName", "Ann"), ("date", "2024-05-01")]),
            )
            .unwrap();

        let doc = store.get(Collection::Appointments, &id).unwrap().unwrap();
        assert_eq!(doc.fields["patientName"], "Ann");
        assert!(store.get(Collection::Doctors, &id).unwrap().is_none());

        store
            .update(Collection::Appointments, &id, fields(&[("time", "09:30")]))
            .unwrap();
        let docs = store.list_all(Collection::Appointments).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["time"], "09:30");
        assert_eq!(docs[0].fields["date"], "2024-05-01");

        store.delete(Collection::Appointments, &id).unwrap();
        assert!(store.list_all(Collection::Appointments).unwrap().is_empty());
    }

    #[test]
    fn update_of_missing_document_fails() {
        let (_dir, store) = store();
        assert!(store
            .update(Collection::Users, "missing", Fields::new())
            .is_err());
    }
}
