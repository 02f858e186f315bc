//! Webhook trigger types: event selection and the persisted registration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormalooError;

/// Which form events a trigger subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    FormSubmit,
    RowUpdate,
    PaymentCompleted,
    All,
}

impl WebhookEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventType::FormSubmit => "form_submit",
            WebhookEventType::RowUpdate => "row_update",
            WebhookEventType::PaymentCompleted => "payment_completed",
            WebhookEventType::All => "all",
        }
    }

    pub fn form_submit_events(&self) -> bool {
        matches!(self, WebhookEventType::FormSubmit | WebhookEventType::All)
    }

    pub fn row_update_events(&self) -> bool {
        matches!(self, WebhookEventType::RowUpdate | WebhookEventType::All)
    }

    pub fn row_payment_events(&self) -> bool {
        matches!(self, WebhookEventType::PaymentCompleted | WebhookEventType::All)
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEventType {
    type Err = FormalooError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "form_submit" => Ok(WebhookEventType::FormSubmit),
            "row_update" => Ok(WebhookEventType::RowUpdate),
            "payment_completed" => Ok(WebhookEventType::PaymentCompleted),
            "all" => Ok(WebhookEventType::All),
            other => Err(FormalooError::Validation(format!(
                "unknown webhook event type '{other}' (expected form_submit, row_update, payment_completed or all)"
            ))),
        }
    }
}

/// Registration body sent to `POST /v3.0/forms/{slug}/webhooks/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookSubscription {
    pub title: String,
    pub url: String,
    pub form_submit_events: bool,
    pub row_payment_events: bool,
    pub row_update_events: bool,
    pub send_raw_data: bool,
    pub send_rendered_data: bool,
}

impl WebhookSubscription {
    pub fn new(title_prefix: &str, url: impl Into<String>, event: WebhookEventType) -> Self {
        Self {
            title: format!("{title_prefix} on {event}"),
            url: url.into(),
            form_submit_events: event.form_submit_events(),
            row_payment_events: event.row_payment_events(),
            row_update_events: event.row_update_events(),
            send_raw_data: true,
            send_rendered_data: false,
        }
    }
}

/// Remote webhook registration, persisted per trigger instance.
///
/// Its absence in the instance store means "not yet registered".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookRegistration {
    pub remote_slug: String,
    pub form_slug: String,
    pub event_type: WebhookEventType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sets_every_flag() {
        let sub = WebhookSubscription::new("workflow", "https://hook", WebhookEventType::All);
        assert!(sub.form_submit_events);
        assert!(sub.row_payment_events);
        assert!(sub.row_update_events);
        assert!(sub.send_raw_data);
        assert!(!sub.send_rendered_data);
        assert_eq!(sub.title, "workflow on all");
    }

    #[test]
    fn test_single_event_sets_one_flag() {
        let sub = WebhookSubscription::new("w", "u", WebhookEventType::PaymentCompleted);
        assert!(!sub.form_submit_events);
        assert!(sub.row_payment_events);
        assert!(!sub.row_update_events);
    }

    #[test]
    fn test_event_type_parse() {
        assert_eq!(
            "row_update".parse::<WebhookEventType>().unwrap(),
            WebhookEventType::RowUpdate
        );
        assert!("sometimes".parse::<WebhookEventType>().is_err());
    }

    #[test]
    fn test_registration_serde() {
        let reg = WebhookRegistration {
            remote_slug: "wh1".into(),
            form_slug: "f1".into(),
            event_type: WebhookEventType::FormSubmit,
        };
        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(json["event_type"], "form_submit");
    }
}
