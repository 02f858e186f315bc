//! Webhook trigger: remote registration lifecycle and inbound delivery
//! normalisation, both keyed by trigger instance.

pub mod lifecycle;
pub mod receiver;

use serde_json::Value;
use uuid::Uuid;

use formaloo_types::error::{FormalooError, RepositoryError};
use formaloo_types::webhook::WebhookRegistration;

use crate::storage::state_store::InstanceStateStore;

/// Instance-store key holding the serialized [`WebhookRegistration`].
pub const REGISTRATION_KEY: &str = "webhook_registration";

/// Read the stored registration of an instance, if any.
pub async fn load_registration<S: InstanceStateStore>(
    store: &S,
    instance_id: &Uuid,
) -> Result<Option<WebhookRegistration>, FormalooError> {
    let Some(value) = store.get(instance_id, REGISTRATION_KEY).await? else {
        return Ok(None);
    };
    let registration = serde_json::from_value(value).map_err(|e| {
        RepositoryError::Query(format!("stored webhook registration is unreadable: {e}"))
    })?;
    Ok(Some(registration))
}

pub(crate) async fn save_registration<S: InstanceStateStore>(
    store: &S,
    instance_id: &Uuid,
    registration: &WebhookRegistration,
) -> Result<(), FormalooError> {
    let value: Value = serde_json::to_value(registration)
        .map_err(|e| RepositoryError::Query(format!("failed to encode registration: {e}")))?;
    store.set(instance_id, REGISTRATION_KEY, &value).await?;
    Ok(())
}
