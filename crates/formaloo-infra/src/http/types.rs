//! Formaloo REST payloads.
//!
//! Wire-level envelopes only. Every nested level is optional so that a
//! missing key surfaces as `InvalidResponse` with a useful message instead of
//! a bare decode error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use formaloo_types::form::{ChoiceOption, FieldRecord, Form};

#[derive(Debug, Serialize)]
pub struct TokenRequest {
    pub grant_type: &'static str,
}

impl Default for TokenRequest {
    fn default() -> Self {
        Self {
            grant_type: "client_credentials",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub authorization_token: Option<String>,
}

/// Generic `{ "data": ... }` envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct FormsData {
    #[serde(default)]
    pub forms: Option<Vec<FormDto>>,
    #[serde(default)]
    pub next: Option<Value>,
}

impl FormsData {
    /// `next` counts as present unless it is null, `false` or an empty string.
    pub fn has_next(&self) -> bool {
        match &self.next {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FormDto {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<FormDto> for Form {
    fn from(dto: FormDto) -> Self {
        Form {
            slug: dto.slug.unwrap_or_default(),
            title: dto.title.unwrap_or_default(),
            description: dto.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FormDetailData {
    #[serde(default)]
    pub form: Option<FormDetail>,
}

#[derive(Debug, Deserialize)]
pub struct FormDetail {
    #[serde(default)]
    pub fields_list: Option<Vec<FieldRecord>>,
}

#[derive(Debug, Deserialize)]
pub struct FieldDetailData {
    #[serde(default)]
    pub field: Option<FieldDetail>,
}

#[derive(Debug, Deserialize)]
pub struct FieldDetail {
    #[serde(default)]
    pub choice_items: Option<Vec<ChoiceOption>>,
}

#[derive(Debug, Deserialize)]
pub struct ChoicesData {
    #[serde(default)]
    pub objects: Option<Vec<ChoiceOption>>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub webhook: Option<WebhookDto>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookDto {
    #[serde(default)]
    pub slug: Option<String>,
}
