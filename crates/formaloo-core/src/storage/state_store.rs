//! Instance-scoped key-value store trait.
//!
//! Each trigger instance owns its own key space; the webhook lifecycle keeps
//! its registration record here between activation and deactivation.

use formaloo_types::error::RepositoryError;
use uuid::Uuid;

/// Trait for trigger-instance persistent storage.
///
/// Stores arbitrary JSON values keyed by instance ID and string key.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in formaloo-infra.
pub trait InstanceStateStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        instance_id: &Uuid,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        instance_id: &Uuid,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a key. No-op if key does not exist.
    fn delete(
        &self,
        instance_id: &Uuid,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List all keys for an instance.
    fn list_keys(
        &self,
        instance_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;
}
