//! FormalooHttpClient -- concrete [`FormalooApi`] implementation over reqwest.
//!
//! Every authenticated request carries `Authorization: JWT <token>` and
//! `X-Api-Key`, plus `X-Workspace` when the credential names one. Secrets are
//! only exposed while building headers.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;

use formaloo_core::api::FormalooApi;
use formaloo_types::credential::AuthContext;
use formaloo_types::error::FormalooError;
use formaloo_types::form::{ChoiceOption, ChoiceSearch, FieldRecord, FormListQuery, FormPage};
use formaloo_types::submission::SubmissionBody;
use formaloo_types::webhook::WebhookSubscription;

use super::types::{
    ChoicesData, Envelope, FieldDetailData, FormDetailData, FormsData, TokenRequest,
    TokenResponse, WebhookData,
};

/// Longest error body echoed back in an `Api` error.
const MAX_ERROR_BODY: usize = 500;

pub struct FormalooHttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl FormalooHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FormalooError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FormalooError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder, auth: &AuthContext) -> RequestBuilder {
        let builder = builder
            .header("Authorization", auth.authorization())
            .header("X-Api-Key", auth.api_key.expose_secret());
        match &auth.workspace {
            Some(workspace) => builder.header("X-Workspace", workspace),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, FormalooError> {
        let response = builder
            .send()
            .await
            .map_err(|e| FormalooError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut message = response.text().await.unwrap_or_default();
        if message.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| message.is_char_boundary(*i))
                .unwrap_or(0);
            message.truncate(cut);
        }
        tracing::debug!(status = status.as_u16(), "Formaloo API returned an error status");
        Err(FormalooError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, FormalooError> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| FormalooError::InvalidResponse(format!("failed to parse response: {e}")))
    }

    async fn data<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, FormalooError> {
        let envelope: Envelope<T> = self.send_json(builder).await?;
        envelope
            .data
            .ok_or_else(|| FormalooError::InvalidResponse("response has no data".to_string()))
    }
}

impl FormalooApi for FormalooHttpClient {
    async fn issue_token(&self, secret_api: &SecretString) -> Result<String, FormalooError> {
        let request = self
            .client
            .post(self.url("/v3.0/oauth2/authorization-token/"))
            .header("Authorization", format!("Basic {}", secret_api.expose_secret()))
            .json(&TokenRequest::default());

        let body: TokenResponse = self.send_json(request).await?;
        body.authorization_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                FormalooError::Authentication(
                    "failed to get JWT token from authentication endpoint".to_string(),
                )
            })
    }

    async fn list_forms(
        &self,
        auth: &AuthContext,
        query: &FormListQuery,
    ) -> Result<FormPage, FormalooError> {
        let mut params = vec![
            ("page_size", query.page_size.to_string()),
            ("page", query.page.to_string()),
        ];
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        let request = self
            .authed(self.client.get(self.url("/v3.0/forms/")), auth)
            .query(&params);

        let data: FormsData = self.data(request).await?;
        let has_next = data.has_next();
        let forms = data.forms.ok_or_else(|| {
            FormalooError::InvalidResponse("forms response has no data.forms list".to_string())
        })?;
        Ok(FormPage {
            forms: forms.into_iter().map(Into::into).collect(),
            has_next,
        })
    }

    async fn form_fields(
        &self,
        auth: &AuthContext,
        form_slug: &str,
    ) -> Result<Vec<FieldRecord>, FormalooError> {
        let request = self.authed(
            self.client.get(self.url(&format!("/v3.0/forms/{form_slug}/"))),
            auth,
        );

        let data: FormDetailData = self.data(request).await?;
        data.form.and_then(|form| form.fields_list).ok_or_else(|| {
            FormalooError::InvalidResponse(format!("form '{form_slug}' has no fields_list"))
        })
    }

    async fn field_choices(
        &self,
        auth: &AuthContext,
        field_slug: &str,
    ) -> Result<Vec<ChoiceOption>, FormalooError> {
        let request = self.authed(
            self.client.get(self.url(&format!("/v3.0/fields/{field_slug}/"))),
            auth,
        );

        let data: FieldDetailData = self.data(request).await?;
        data.field.and_then(|field| field.choice_items).ok_or_else(|| {
            FormalooError::InvalidResponse(format!("no options found for field '{field_slug}'"))
        })
    }

    async fn search_choices(
        &self,
        auth: &AuthContext,
        field_slug: &str,
        search: &str,
    ) -> Result<ChoiceSearch, FormalooError> {
        let request = self
            .authed(
                self.client
                    .get(self.url(&format!("/v4/fields/{field_slug}/choices/"))),
                auth,
            )
            .query(&[("search", search)]);

        let data: ChoicesData = self.data(request).await?;
        let objects = data.objects.ok_or_else(|| {
            FormalooError::InvalidResponse(format!(
                "choices response for field '{field_slug}' has no data.objects list"
            ))
        })?;
        let count = data.count.unwrap_or(objects.len() as u64);
        Ok(ChoiceSearch { objects, count })
    }

    async fn submit_form(
        &self,
        auth: &AuthContext,
        form_slug: &str,
        body: &SubmissionBody,
    ) -> Result<Value, FormalooError> {
        let request = self
            .authed(
                self.client.post(
                    self.url(&format!("/v3.0/form-displays/slug/{form_slug}/submit/")),
                ),
                auth,
            )
            .json(body);

        let response = self.send(request).await?;
        let text = response
            .text()
            .await
            .map_err(|e| FormalooError::Transport(format!("failed to read response: {e}")))?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    async fn create_webhook(
        &self,
        auth: &AuthContext,
        form_slug: &str,
        subscription: &WebhookSubscription,
    ) -> Result<String, FormalooError> {
        let request = self
            .authed(
                self.client
                    .post(self.url(&format!("/v3.0/forms/{form_slug}/webhooks/"))),
                auth,
            )
            .json(subscription);

        let data: WebhookData = self.data(request).await?;
        data.webhook
            .and_then(|webhook| webhook.slug)
            .filter(|slug| !slug.is_empty())
            .ok_or_else(|| {
                FormalooError::InvalidResponse("no webhook slug returned".to_string())
            })
    }

    async fn get_webhook(
        &self,
        auth: &AuthContext,
        form_slug: &str,
        webhook_slug: &str,
    ) -> Result<(), FormalooError> {
        let request = self.authed(
            self.client.get(
                self.url(&format!("/v3.0/forms/{form_slug}/webhooks/{webhook_slug}/")),
            ),
            auth,
        );
        self.send(request).await.map(|_| ())
    }

    async fn delete_webhook(
        &self,
        auth: &AuthContext,
        form_slug: &str,
        webhook_slug: &str,
    ) -> Result<(), FormalooError> {
        let request = self.authed(
            self.client.delete(
                self.url(&format!("/v3.0/forms/{form_slug}/webhooks/{webhook_slug}/")),
            ),
            auth,
        );
        self.send(request).await.map(|_| ())
    }

    fn form_url(&self, form_slug: &str) -> String {
        self.url(&format!("/v3.0/forms/{form_slug}/"))
    }
}
