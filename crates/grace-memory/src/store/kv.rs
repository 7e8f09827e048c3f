//! Raw key/value documents.

use super::Store;
use grace_core::error::GraceError;

impl Store {
    /// Upsert a document.
    pub async fn put_value(&self, key: &str, value: &str) -> Result<(), GraceError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| GraceError::Memory(format!("upsert {key} failed: {e}")))?;

        Ok(())
    }

    /// Get a document by key.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, GraceError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| GraceError::Memory(format!("query failed: {e}")))?;

        Ok(row.map(|(v,)| v))
    }

    /// Delete a document. Returns `true` if a row was deleted.
    pub async fn delete_value(&self, key: &str) -> Result<bool, GraceError> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| GraceError::Memory(format!("delete failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
