//! Submission assembler: builds the request body from resolved rows and
//! metadata and posts it to the form's submit endpoint.

use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use serde_json::Value;

use formaloo_types::credential::{AuthContext, Credential};
use formaloo_types::error::FormalooError;
use formaloo_types::form::FormLocator;
use formaloo_types::submission::{
    ItemOutcome, SubmissionBody, SubmissionMetadata, SubmissionReceipt, SubmissionRow,
    SubmitRequest,
};

use crate::api::FormalooApi;
use crate::auth::{authenticate, ensure_complete};
use crate::catalog::FormCatalog;
use crate::resolver::FieldResolver;

const SUBMIT_TIME_FORMAT: &str = "%H:%M:%S";

pub struct SubmissionService<A> {
    api: Arc<A>,
    resolver: FieldResolver<A>,
}

impl<A: FormalooApi> SubmissionService<A> {
    pub fn new(catalog: Arc<FormCatalog<A>>) -> Self {
        Self {
            api: catalog.api().clone(),
            resolver: FieldResolver::new(catalog),
        }
    }

    /// Submit one request.
    ///
    /// Credentials and the form identifier are checked before any network
    /// call; an empty body is rejected before the submit POST.
    pub async fn submit(
        &self,
        credential: &Credential,
        request: &SubmitRequest,
    ) -> Result<SubmissionReceipt, FormalooError> {
        ensure_complete(credential)?;

        let form_slug = FormLocator::parse(&request.form).slug();
        if form_slug.is_empty() {
            return Err(FormalooError::Validation("Form is required".to_string()));
        }

        let auth = authenticate(self.api.as_ref(), credential).await?;
        let body = self
            .build_body(&auth, &request.fields, &request.metadata)
            .await?;

        tracing::info!(form_slug = %form_slug, keys = body.len(), "submitting form");
        let response = self.api.submit_form(&auth, &form_slug, &body).await?;

        Ok(SubmissionReceipt {
            success: true,
            response,
            submitted_data: body,
            form_slug,
            timestamp: Utc::now(),
        })
    }

    /// Submit items in order.
    ///
    /// With `continue_on_fail` a failing item is recorded and the run goes
    /// on; otherwise the first failure aborts the batch.
    pub async fn execute_batch(
        &self,
        credential: &Credential,
        items: &[SubmitRequest],
        continue_on_fail: bool,
    ) -> Result<Vec<ItemOutcome>, FormalooError> {
        let mut outcomes = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            match self.submit(credential, item).await {
                Ok(receipt) => outcomes.push(ItemOutcome::Submitted(receipt)),
                Err(e) if continue_on_fail => {
                    tracing::warn!(index, error = %e, "submission item failed, continuing");
                    outcomes.push(ItemOutcome::failed(e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(outcomes)
    }

    async fn build_body(
        &self,
        auth: &AuthContext,
        rows: &[SubmissionRow],
        metadata: &SubmissionMetadata,
    ) -> Result<SubmissionBody, FormalooError> {
        let mut body = SubmissionBody::new();

        for row in rows {
            if let Some((key, value)) = self.resolver.resolve(auth, row).await? {
                body.insert(key, value);
            }
        }

        if let Some(submit_time) = metadata.submit_time.as_deref().filter(|t| !t.is_empty()) {
            validate_submit_time(submit_time)?;
        }
        for (key, value) in metadata.entries() {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                body.insert(key.to_string(), Value::String(value.to_string()));
            }
        }

        if body.is_empty() {
            return Err(FormalooError::Validation(
                "No data to submit. Please add at least one field or metadata value".to_string(),
            ));
        }
        Ok(body)
    }
}

fn validate_submit_time(value: &str) -> Result<(), FormalooError> {
    NaiveTime::parse_from_str(value, SUBMIT_TIME_FORMAT)
        .map(|_| ())
        .map_err(|_| {
            FormalooError::Validation(format!(
                "submit_time '{value}' must be in HH:MM:SS format"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockApi, color_options};
    use formaloo_types::form::FieldRef;
    use serde_json::json;

    fn service(api: MockApi) -> (Arc<MockApi>, SubmissionService<MockApi>) {
        let api = Arc::new(api);
        let catalog = Arc::new(FormCatalog::new(api.clone(), 25, 10));
        (api, SubmissionService::new(catalog))
    }

    fn request(form: &str, rows: &[(&str, &str)]) -> SubmitRequest {
        SubmitRequest {
            form: form.to_string(),
            fields: rows
                .iter()
                .map(|(r, v)| SubmissionRow::new(FieldRef::parse(r), *v))
                .collect(),
            metadata: SubmissionMetadata::default(),
        }
    }

    fn credential() -> Credential {
        Credential::self_issued("key-1", "secret-1")
    }

    #[tokio::test]
    async fn test_submit_resolves_rows_and_posts() {
        let (api, service) = service(MockApi::new().with_choices("color", color_options()));
        let req = request(
            "https://formaloo.me/forms/abc123/",
            &[("name", "Ada"), ("color - dropdown", "BLUE")],
        );

        let receipt = service.submit(&credential(), &req).await.unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.form_slug, "abc123");
        assert_eq!(receipt.submitted_data["name"], json!("Ada"));
        assert_eq!(receipt.submitted_data["color"], json!("b"));
        assert_eq!(
            api.calls(),
            vec!["issue_token", "field_choices:color", "submit_form:abc123"]
        );
    }

    #[tokio::test]
    async fn test_later_rows_overwrite_earlier_keys() {
        let (_, service) = service(MockApi::new());
        let req = request("f1", &[("name", "first"), ("name", "second")]);

        let receipt = service.submit(&credential(), &req).await.unwrap();

        assert_eq!(receipt.submitted_data["name"], json!("second"));
    }

    #[tokio::test]
    async fn test_metadata_only_added_when_present() {
        let (api, service) = service(MockApi::new());
        let mut req = request("f1", &[]);
        req.metadata = SubmissionMetadata {
            submit_code: Some("X1".to_string()),
            recaptcha_value: Some(String::new()),
            submitter_referer_address: None,
            submit_time: Some("09:30:00".to_string()),
        };

        service.submit(&credential(), &req).await.unwrap();

        let submitted = api.submitted.lock().unwrap();
        let body = &submitted[0].1;
        assert_eq!(body.len(), 2);
        assert_eq!(body["submit_code"], json!("X1"));
        assert_eq!(body["submit_time"], json!("09:30:00"));
    }

    #[tokio::test]
    async fn test_bad_submit_time_rejected() {
        let (api, service) = service(MockApi::new());
        let mut req = request("f1", &[("name", "Ada")]);
        req.metadata.submit_time = Some("9:30".to_string());

        let err = service.submit(&credential(), &req).await.unwrap_err();

        assert!(matches!(err, FormalooError::Validation(_)));
        assert!(api.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_rejected_before_post() {
        let (api, service) = service(MockApi::new());

        let err = service
            .submit(&credential(), &request("f1", &[]))
            .await
            .unwrap_err();

        assert!(matches!(err, FormalooError::Validation(_)));
        assert!(!api.calls().iter().any(|c| c.starts_with("submit_form")));
    }

    #[tokio::test]
    async fn test_missing_form_rejected_without_network() {
        let (api, service) = service(MockApi::new());

        let err = service
            .submit(&credential(), &request("  ", &[("name", "Ada")]))
            .await
            .unwrap_err();

        assert!(matches!(err, FormalooError::Validation(msg) if msg == "Form is required"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolver_error_aborts_submission() {
        let (api, service) = service(MockApi::new().with_choices("color", color_options()));
        let req = request("f1", &[("name", "Ada"), ("color - choice", "Green")]);

        let err = service.submit(&credential(), &req).await.unwrap_err();

        assert!(matches!(err, FormalooError::FieldOptionNotFound(_)));
        assert!(api.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pre_issued_submission_carries_workspace() {
        let (api, service) = service(MockApi::new());
        let cred = Credential::pre_issued("tok", "key", "acme");

        service
            .submit(&cred, &request("f1", &[("name", "Ada")]))
            .await
            .unwrap();

        let submitted = api.submitted.lock().unwrap();
        assert_eq!(submitted[0].2.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_batch_continue_on_fail_records_errors() {
        let (_, service) = service(MockApi::new());
        let items = vec![
            request("f1", &[("name", "Ada")]),
            request("", &[("name", "Bob")]),
            request("f2", &[("name", "Cy")]),
        ];

        let outcomes = service
            .execute_batch(&credential(), &items, true)
            .await
            .unwrap();

        let flags: Vec<bool> = outcomes.iter().map(ItemOutcome::is_success).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[tokio::test]
    async fn test_batch_stops_on_first_failure() {
        let (api, service) = service(MockApi::new());
        let items = vec![request("", &[("name", "Bob")]), request("f2", &[("name", "Cy")])];

        let err = service
            .execute_batch(&credential(), &items, false)
            .await
            .unwrap_err();

        assert!(matches!(err, FormalooError::Validation(_)));
        assert!(api.submitted.lock().unwrap().is_empty());
    }
}
