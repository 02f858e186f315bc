//! Inbound webhook deliveries.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use formaloo_types::error::FormalooError;

use crate::storage::state_store::InstanceStateStore;

use super::load_registration;

pub struct WebhookReceiver<S> {
    store: Arc<S>,
}

impl<S: InstanceStateStore> WebhookReceiver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Turn one delivery into exactly one event.
    ///
    /// Any failure produces an `{error, raw_body, timestamp}` event instead.
    pub async fn receive(&self, instance_id: &Uuid, body: Value) -> Value {
        match self.normalize(instance_id, &body).await {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(%instance_id, error = %e, "failed to process webhook delivery");
                json!({
                    "error": e.to_string(),
                    "raw_body": body,
                    "timestamp": Utc::now().to_rfc3339(),
                })
            }
        }
    }

    async fn normalize(&self, instance_id: &Uuid, body: &Value) -> Result<Value, FormalooError> {
        let registration = load_registration(self.store.as_ref(), instance_id).await?;
        let payload = parse_body(body);

        let metadata = json!({
            "received_at": Utc::now().to_rfc3339(),
            "form_slug": payload.get("form").cloned().unwrap_or(Value::Null),
            "event_type": registration.as_ref().map(|r| r.event_type.as_str()),
            "webhook_slug": registration.as_ref().map(|r| r.remote_slug.as_str()),
        });

        let mut event = match payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("body".to_string(), other);
                map
            }
        };
        event.insert("_webhook_metadata".to_string(), metadata);

        tracing::debug!(%instance_id, "webhook delivery normalised");
        Ok(Value::Object(event))
    }
}

/// A string body holding JSON is decoded; anything else is kept as-is.
fn parse_body(body: &Value) -> Value {
    match body {
        Value::String(text) => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use crate::webhook::save_registration;
    use formaloo_types::webhook::{WebhookEventType, WebhookRegistration};

    async fn registered_store(instance: &Uuid) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let registration = WebhookRegistration {
            remote_slug: "wh-1".to_string(),
            form_slug: "form1".to_string(),
            event_type: WebhookEventType::FormSubmit,
        };
        save_registration(store.as_ref(), instance, &registration)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_object_body_gets_metadata() {
        let instance = Uuid::now_v7();
        let receiver = WebhookReceiver::new(registered_store(&instance).await);

        let event = receiver
            .receive(&instance, json!({"form": "form1", "data": {"name": "Ada"}}))
            .await;

        assert_eq!(event["data"]["name"], "Ada");
        let meta = &event["_webhook_metadata"];
        assert_eq!(meta["form_slug"], "form1");
        assert_eq!(meta["event_type"], "form_submit");
        assert_eq!(meta["webhook_slug"], "wh-1");
        assert!(meta["received_at"].is_string());
    }

    #[tokio::test]
    async fn test_json_string_body_is_decoded() {
        let instance = Uuid::now_v7();
        let receiver = WebhookReceiver::new(registered_store(&instance).await);

        let event = receiver
            .receive(&instance, Value::String(r#"{"form":"f9","row":1}"#.to_string()))
            .await;

        assert_eq!(event["row"], 1);
        assert_eq!(event["_webhook_metadata"]["form_slug"], "f9");
    }

    #[tokio::test]
    async fn test_plain_text_body_is_wrapped() {
        let instance = Uuid::now_v7();
        let receiver = WebhookReceiver::new(Arc::new(MemoryStore::new()));

        let event = receiver
            .receive(&instance, Value::String("ping".to_string()))
            .await;

        assert_eq!(event["body"], "ping");
        assert!(event["_webhook_metadata"]["webhook_slug"].is_null());
    }

    #[tokio::test]
    async fn test_store_failure_yields_error_event() {
        let receiver = WebhookReceiver::new(Arc::new(MemoryStore::failing_reads()));

        let event = receiver
            .receive(&Uuid::now_v7(), json!({"form": "form1"}))
            .await;

        assert!(event["error"].is_string());
        assert_eq!(event["raw_body"], json!({"form": "form1"}));
        assert!(event["timestamp"].is_string());
        assert!(event.get("_webhook_metadata").is_none());
    }
}
