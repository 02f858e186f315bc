//! Remote webhook registration for a trigger instance.
//!
//! An instance is either unregistered (no record in its store) or registered
//! (record present). `create` moves it to registered, `delete` always ends
//! unregistered.

use std::sync::Arc;

use uuid::Uuid;

use formaloo_types::credential::Credential;
use formaloo_types::error::FormalooError;
use formaloo_types::form::FormLocator;
use formaloo_types::webhook::{WebhookEventType, WebhookRegistration, WebhookSubscription};

use crate::api::FormalooApi;
use crate::auth::{authenticate, ensure_complete};
use crate::storage::state_store::InstanceStateStore;

use super::{REGISTRATION_KEY, load_registration, save_registration};

pub struct WebhookLifecycle<A, S> {
    api: Arc<A>,
    store: Arc<S>,
    title_prefix: String,
}

impl<A: FormalooApi, S: InstanceStateStore> WebhookLifecycle<A, S> {
    pub fn new(api: Arc<A>, store: Arc<S>, title_prefix: impl Into<String>) -> Self {
        Self {
            api,
            store,
            title_prefix: title_prefix.into(),
        }
    }

    pub async fn registration(
        &self,
        instance_id: &Uuid,
    ) -> Result<Option<WebhookRegistration>, FormalooError> {
        load_registration(self.store.as_ref(), instance_id).await
    }

    /// Whether the stored registration still exists remotely.
    ///
    /// Never fails: store, credential and remote errors all read as `false`.
    pub async fn check_exists(&self, credential: &Credential, instance_id: &Uuid) -> bool {
        let registration = match self.registration(instance_id).await {
            Ok(Some(registration)) => registration,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(%instance_id, error = %e, "failed to read webhook registration");
                return false;
            }
        };

        let auth = match authenticate(self.api.as_ref(), credential).await {
            Ok(auth) => auth,
            Err(e) => {
                tracing::warn!(%instance_id, error = %e, "cannot check webhook without credentials");
                return false;
            }
        };

        match self
            .api
            .get_webhook(&auth, &registration.form_slug, &registration.remote_slug)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(
                    %instance_id,
                    webhook_slug = %registration.remote_slug,
                    error = %e,
                    "webhook not reachable"
                );
                false
            }
        }
    }

    /// Register a webhook for `form` and persist the registration.
    pub async fn create(
        &self,
        credential: &Credential,
        instance_id: &Uuid,
        form: &str,
        event: WebhookEventType,
        callback_url: &str,
    ) -> Result<WebhookRegistration, FormalooError> {
        ensure_complete(credential)?;

        let form_slug = FormLocator::parse(form).slug();
        if form_slug.is_empty() {
            return Err(FormalooError::Validation("Form is required".to_string()));
        }
        if callback_url.trim().is_empty() {
            return Err(FormalooError::Validation(
                "a callback URL is required to register a webhook".to_string(),
            ));
        }

        let auth = authenticate(self.api.as_ref(), credential).await?;
        let subscription = WebhookSubscription::new(&self.title_prefix, callback_url.trim(), event);
        let remote_slug = self
            .api
            .create_webhook(&auth, &form_slug, &subscription)
            .await?;

        let registration = WebhookRegistration {
            remote_slug,
            form_slug,
            event_type: event,
        };
        if let Err(e) = save_registration(self.store.as_ref(), instance_id, &registration).await {
            // Without a stored record nothing could delete the remote webhook later.
            if let Err(rollback) = self
                .api
                .delete_webhook(&auth, &registration.form_slug, &registration.remote_slug)
                .await
            {
                tracing::warn!(
                    %instance_id,
                    webhook_slug = %registration.remote_slug,
                    error = %rollback,
                    "failed to roll back remote webhook"
                );
            }
            return Err(e);
        }

        tracing::info!(
            %instance_id,
            form_slug = %registration.form_slug,
            webhook_slug = %registration.remote_slug,
            event = %event,
            "webhook registered"
        );
        Ok(registration)
    }

    /// Remove the remote webhook and forget the registration.
    ///
    /// Remote failures are logged only; the stored registration is cleared
    /// regardless so the instance always ends unregistered. Without a
    /// credential the remote DELETE is skipped.
    pub async fn delete(&self, credential: Option<&Credential>, instance_id: &Uuid) {
        let registration = match self.registration(instance_id).await {
            Ok(Some(registration)) => registration,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(%instance_id, error = %e, "failed to read webhook registration");
                self.clear(instance_id).await;
                return;
            }
        };

        let Some(credential) = credential else {
            tracing::warn!(
                %instance_id,
                webhook_slug = %registration.remote_slug,
                "no credentials; remote webhook left in place"
            );
            self.clear(instance_id).await;
            return;
        };

        let outcome = match authenticate(self.api.as_ref(), credential).await {
            Ok(auth) => {
                self.api
                    .delete_webhook(&auth, &registration.form_slug, &registration.remote_slug)
                    .await
            }
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => tracing::info!(
                %instance_id,
                webhook_slug = %registration.remote_slug,
                "webhook deleted"
            ),
            Err(e) => tracing::warn!(
                %instance_id,
                webhook_slug = %registration.remote_slug,
                error = %e,
                "failed to delete remote webhook"
            ),
        }

        self.clear(instance_id).await;
    }

    async fn clear(&self, instance_id: &Uuid) {
        if let Err(e) = self.store.delete(instance_id, REGISTRATION_KEY).await {
            tracing::warn!(%instance_id, error = %e, "failed to clear webhook registration");
        }
    }
}
