//! In-memory fakes for the core ports, shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use secrecy::SecretString;
use serde_json::{Value, json};
use uuid::Uuid;

use formaloo_types::credential::AuthContext;
use formaloo_types::error::{FormalooError, RepositoryError};
use formaloo_types::form::{ChoiceOption, ChoiceSearch, FieldRecord, FormListQuery, FormPage};
use formaloo_types::submission::SubmissionBody;
use formaloo_types::webhook::WebhookSubscription;

use crate::api::FormalooApi;
use crate::storage::state_store::InstanceStateStore;

pub fn option(title: &str, slug: &str) -> ChoiceOption {
    ChoiceOption {
        title: title.to_string(),
        slug: slug.to_string(),
    }
}

pub fn color_options() -> Vec<ChoiceOption> {
    vec![option("Red", "r"), option("Blue", "b")]
}

pub fn auth_context() -> AuthContext {
    AuthContext {
        token: SecretString::from("token-1".to_string()),
        api_key: SecretString::from("key-1".to_string()),
        workspace: None,
    }
}

/// Scripted `FormalooApi` that records every call.
#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<String>>,
    token_error: Mutex<Option<FormalooError>>,
    form_pages: Vec<FormPage>,
    fields: Vec<FieldRecord>,
    choices: HashMap<String, Vec<ChoiceOption>>,
    searches: HashMap<String, ChoiceSearch>,
    webhook_reachable: bool,
    fail_create: bool,
    fail_delete: bool,
    pub submitted: Mutex<Vec<(String, SubmissionBody, Option<String>)>>,
    pub subscriptions: Mutex<Vec<(String, WebhookSubscription)>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token_error(self, err: FormalooError) -> Self {
        *self.token_error.lock().unwrap() = Some(err);
        self
    }

    pub fn with_form_page(mut self, page: FormPage) -> Self {
        self.form_pages.push(page);
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldRecord>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_choices(mut self, field_slug: &str, options: Vec<ChoiceOption>) -> Self {
        self.choices.insert(field_slug.to_string(), options);
        self
    }

    pub fn with_search(mut self, field_slug: &str, objects: Vec<ChoiceOption>, count: u64) -> Self {
        self.searches
            .insert(field_slug.to_string(), ChoiceSearch { objects, count });
        self
    }

    pub fn with_webhook_reachable(mut self, reachable: bool) -> Self {
        self.webhook_reachable = reachable;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl FormalooApi for MockApi {
    async fn issue_token(&self, _secret_api: &SecretString) -> Result<String, FormalooError> {
        self.record("issue_token".to_string());
        match self.token_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok("issued-token".to_string()),
        }
    }

    async fn list_forms(
        &self,
        _auth: &AuthContext,
        query: &FormListQuery,
    ) -> Result<FormPage, FormalooError> {
        self.record(format!("list_forms:{}", query.page));
        Ok(self
            .form_pages
            .get(query.page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }

    async fn form_fields(
        &self,
        _auth: &AuthContext,
        form_slug: &str,
    ) -> Result<Vec<FieldRecord>, FormalooError> {
        self.record(format!("form_fields:{form_slug}"));
        Ok(self.fields.clone())
    }

    async fn field_choices(
        &self,
        _auth: &AuthContext,
        field_slug: &str,
    ) -> Result<Vec<ChoiceOption>, FormalooError> {
        self.record(format!("field_choices:{field_slug}"));
        self.choices.get(field_slug).cloned().ok_or_else(|| {
            FormalooError::InvalidResponse("field has no choice items".to_string())
        })
    }

    async fn search_choices(
        &self,
        _auth: &AuthContext,
        field_slug: &str,
        search: &str,
    ) -> Result<ChoiceSearch, FormalooError> {
        self.record(format!("search_choices:{field_slug}:{search}"));
        Ok(self.searches.get(field_slug).cloned().unwrap_or_default())
    }

    async fn submit_form(
        &self,
        auth: &AuthContext,
        form_slug: &str,
        body: &SubmissionBody,
    ) -> Result<Value, FormalooError> {
        self.record(format!("submit_form:{form_slug}"));
        self.submitted.lock().unwrap().push((
            form_slug.to_string(),
            body.clone(),
            auth.workspace.clone(),
        ));
        Ok(json!({"status": 201, "data": {"row": {"slug": "row-1"}}}))
    }

    async fn create_webhook(
        &self,
        _auth: &AuthContext,
        form_slug: &str,
        subscription: &WebhookSubscription,
    ) -> Result<String, FormalooError> {
        self.record(format!("create_webhook:{form_slug}"));
        if self.fail_create {
            return Err(FormalooError::Api {
                status: 400,
                message: "bad url".to_string(),
            });
        }
        self.subscriptions
            .lock()
            .unwrap()
            .push((form_slug.to_string(), subscription.clone()));
        Ok("wh-remote-1".to_string())
    }

    async fn get_webhook(
        &self,
        _auth: &AuthContext,
        form_slug: &str,
        webhook_slug: &str,
    ) -> Result<(), FormalooError> {
        self.record(format!("get_webhook:{form_slug}/{webhook_slug}"));
        if self.webhook_reachable {
            Ok(())
        } else {
            Err(FormalooError::Api {
                status: 404,
                message: "not found".to_string(),
            })
        }
    }

    async fn delete_webhook(
        &self,
        _auth: &AuthContext,
        form_slug: &str,
        webhook_slug: &str,
    ) -> Result<(), FormalooError> {
        self.record(format!("delete_webhook:{form_slug}/{webhook_slug}"));
        if self.fail_delete {
            Err(FormalooError::Transport("connection reset".to_string()))
        } else {
            Ok(())
        }
    }

    fn form_url(&self, form_slug: &str) -> String {
        format!("https://api.test/v3.0/forms/{form_slug}/")
    }
}

/// HashMap-backed `InstanceStateStore`.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(Uuid, String), Value>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

impl InstanceStateStore for MemoryStore {
    async fn get(&self, instance_id: &Uuid, key: &str) -> Result<Option<Value>, RepositoryError> {
        if self.fail_reads {
            return Err(RepositoryError::Connection);
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(*instance_id, key.to_string()))
            .cloned())
    }

    async fn set(&self, instance_id: &Uuid, key: &str, value: &Value) -> Result<(), RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Query("disk full".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert((*instance_id, key.to_string()), value.clone());
        Ok(())
    }

    async fn delete(&self, instance_id: &Uuid, key: &str) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .unwrap()
            .remove(&(*instance_id, key.to_string()));
        Ok(())
    }

    async fn list_keys(&self, instance_id: &Uuid) -> Result<Vec<String>, RepositoryError> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|(id, _)| id == instance_id)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
