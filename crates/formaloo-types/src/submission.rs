//! Form submission inputs and outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::form::FieldRef;

/// Resolved request body: field slug (or metadata key) to value.
pub type SubmissionBody = Map<String, Value>;

/// One user-entered `(field reference, raw value)` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub field: FieldRef,
    #[serde(default)]
    pub value: String,
}

impl SubmissionRow {
    pub fn new(field: FieldRef, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Optional submission metadata; each entry is sent only when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    #[serde(default)]
    pub submit_code: Option<String>,
    #[serde(default)]
    pub recaptcha_value: Option<String>,
    #[serde(default)]
    pub submitter_referer_address: Option<String>,
    /// Submit time in `HH:MM:SS` format.
    #[serde(default)]
    pub submit_time: Option<String>,
}

impl SubmissionMetadata {
    /// Body keys paired with their values, in submission order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("submit_code", self.submit_code.as_deref()),
            ("recaptcha_value", self.recaptcha_value.as_deref()),
            (
                "submitter_referer_address",
                self.submitter_referer_address.as_deref(),
            ),
            ("submit_time", self.submit_time.as_deref()),
        ]
    }
}

/// One input item of the submit action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Form slug or form URL.
    pub form: String,
    #[serde(default)]
    pub fields: Vec<SubmissionRow>,
    #[serde(default)]
    pub metadata: SubmissionMetadata,
}

/// Successful submission, surfaced to the caller for observability.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub response: Value,
    pub submitted_data: SubmissionBody,
    pub form_slug: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-item result of a batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ItemOutcome {
    Submitted(SubmissionReceipt),
    Failed {
        success: bool,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl ItemOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        ItemOutcome::Failed {
            success: false,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Submitted(_))
    }
}
