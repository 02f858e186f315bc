//! FormalooApi trait definition.
//!
//! The transport port: one method per remote endpoint, returning typed data
//! or a [`FormalooError`]. Shape validation of payloads happens in the
//! implementation; filtering and disambiguation happen in this crate.
//!
//! Implementations live in formaloo-infra (e.g., `FormalooHttpClient`).

use std::future::Future;

use secrecy::SecretString;
use serde_json::Value;

use formaloo_types::credential::AuthContext;
use formaloo_types::error::FormalooError;
use formaloo_types::form::{ChoiceOption, ChoiceSearch, FieldRecord, FormListQuery, FormPage};
use formaloo_types::submission::SubmissionBody;
use formaloo_types::webhook::WebhookSubscription;

/// Trait for the Formaloo REST API.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait FormalooApi: Send + Sync {
    /// Exchange the secret for a bearer token (`POST /v3.0/oauth2/authorization-token/`).
    fn issue_token(
        &self,
        secret_api: &SecretString,
    ) -> impl Future<Output = Result<String, FormalooError>> + Send;

    /// One page of `GET /v3.0/forms/`.
    fn list_forms(
        &self,
        auth: &AuthContext,
        query: &FormListQuery,
    ) -> impl Future<Output = Result<FormPage, FormalooError>> + Send;

    /// The raw `fields_list` of `GET /v3.0/forms/{slug}/`.
    fn form_fields(
        &self,
        auth: &AuthContext,
        form_slug: &str,
    ) -> impl Future<Output = Result<Vec<FieldRecord>, FormalooError>> + Send;

    /// The `choice_items` of `GET /v3.0/fields/{slug}/`.
    fn field_choices(
        &self,
        auth: &AuthContext,
        field_slug: &str,
    ) -> impl Future<Output = Result<Vec<ChoiceOption>, FormalooError>> + Send;

    /// `GET /v4/fields/{slug}/choices/?search=...`.
    fn search_choices(
        &self,
        auth: &AuthContext,
        field_slug: &str,
        search: &str,
    ) -> impl Future<Output = Result<ChoiceSearch, FormalooError>> + Send;

    /// `POST /v3.0/form-displays/slug/{slug}/submit/`; returns the raw response.
    fn submit_form(
        &self,
        auth: &AuthContext,
        form_slug: &str,
        body: &SubmissionBody,
    ) -> impl Future<Output = Result<Value, FormalooError>> + Send;

    /// Register a webhook; returns the remote webhook slug.
    fn create_webhook(
        &self,
        auth: &AuthContext,
        form_slug: &str,
        subscription: &WebhookSubscription,
    ) -> impl Future<Output = Result<String, FormalooError>> + Send;

    /// Probe a registered webhook; `Ok(())` when it is reachable.
    fn get_webhook(
        &self,
        auth: &AuthContext,
        form_slug: &str,
        webhook_slug: &str,
    ) -> impl Future<Output = Result<(), FormalooError>> + Send;

    fn delete_webhook(
        &self,
        auth: &AuthContext,
        form_slug: &str,
        webhook_slug: &str,
    ) -> impl Future<Output = Result<(), FormalooError>> + Send;

    /// Canonical API URL of a form, shown in search results.
    fn form_url(&self, form_slug: &str) -> String;
}
