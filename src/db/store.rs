use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;

use crate::error::Result;

use super::schema::SCHEMA;

/// Key/value persistence adapter. Each key holds one whole serialized
/// collection; an absent key is a valid empty-collection state.
#[derive(Clone)]
pub struct KvStore {
    conn: Connection,
}

impl KvStore {
    pub async fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn get(&self, key: &'static str) -> Result<Option<String>> {
        let value = self
            .conn
            .call(move |conn| {
                let value = conn
                    .query_row(
                        "SELECT value FROM kv_store WHERE key = ?1",
                        params![key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await?;
        Ok(value)
    }

    pub async fn set(&self, key: &'static str, value: String) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO kv_store (key, value)
                       VALUES (?1, ?2)
                       ON CONFLICT(key) DO UPDATE SET
                           value = excluded.value,
                           updated_at = datetime('now')"#,
                    params![key, value],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}
