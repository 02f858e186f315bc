//! SQLite implementation of `InstanceStateStore`.
//!
//! Values are stored as JSON text in `trigger_state` and decoded on read.

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use formaloo_core::storage::state_store::InstanceStateStore;
use formaloo_types::error::RepositoryError;

use super::pool::DatabasePool;

pub struct SqliteStateStore {
    pool: DatabasePool,
}

impl SqliteStateStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl InstanceStateStore for SqliteStateStore {
    async fn get(
        &self,
        instance_id: &Uuid,
        key: &str,
    ) -> Result<Option<serde_json::Value>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM trigger_state WHERE instance_id = ? AND key = ?")
            .bind(instance_id.to_string())
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(store_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row.try_get("value").map_err(store_error)?;
        let value = serde_json::from_str(&raw)
            .map_err(|e| RepositoryError::Query(format!("invalid JSON value: {e}")))?;
        Ok(Some(value))
    }

    async fn set(
        &self,
        instance_id: &Uuid,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let raw = serde_json::to_string(value)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize value: {e}")))?;

        sqlx::query(
            r#"INSERT INTO trigger_state (instance_id, key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (instance_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(instance_id.to_string())
        .bind(key)
        .bind(&raw)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(store_error)?;

        tracing::debug!(%instance_id, key, "stored trigger state");
        Ok(())
    }

    async fn delete(&self, instance_id: &Uuid, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM trigger_state WHERE instance_id = ? AND key = ?")
            .bind(instance_id.to_string())
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn list_keys(&self, instance_id: &Uuid) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT key FROM trigger_state WHERE instance_id = ? ORDER BY key")
            .bind(instance_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(store_error)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("key").map_err(store_error))
            .collect()
    }
}

/// Pool failures mean the database is unreachable; everything else is a query error.
fn store_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn test_store() -> (tempfile::TempDir, SqliteStateStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("state.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteStateStore::new(pool))
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let (_dir, store) = test_store().await;
        let instance = Uuid::now_v7();
        let value = json!({"remote_slug": "wh-1", "form_slug": "f1", "event_type": "all"});

        store.set(&instance, "webhook_registration", &value).await.unwrap();

        let got = store.get(&instance, "webhook_registration").await.unwrap();
        assert_eq!(got, Some(value));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (_dir, store) = test_store().await;

        let got = store.get(&Uuid::now_v7(), "missing").await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let (_dir, store) = test_store().await;
        let instance = Uuid::now_v7();

        store.set(&instance, "counter", &json!(1)).await.unwrap();
        store.set(&instance, "counter", &json!(2)).await.unwrap();

        let got = store.get(&instance, "counter").await.unwrap();
        assert_eq!(got, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_delete_and_delete_missing() {
        let (_dir, store) = test_store().await;
        let instance = Uuid::now_v7();

        store.set(&instance, "temp", &json!("value")).await.unwrap();
        store.delete(&instance, "temp").await.unwrap();
        store.delete(&instance, "never-set").await.unwrap();

        assert!(store.get(&instance, "temp").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let (_dir, store) = test_store().await;
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();

        store.set(&first, "beta", &json!("b")).await.unwrap();
        store.set(&first, "alpha", &json!("a")).await.unwrap();
        store.set(&second, "gamma", &json!("g")).await.unwrap();

        assert_eq!(store.list_keys(&first).await.unwrap(), vec!["alpha", "beta"]);
        assert_eq!(store.list_keys(&second).await.unwrap(), vec!["gamma"]);
        assert!(store.get(&second, "alpha").await.unwrap().is_none());
    }
}
