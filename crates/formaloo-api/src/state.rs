//! Application state wiring all services together.
//!
//! Core services are generic over the `FormalooApi` and `InstanceStateStore`
//! ports; AppState pins them to the reqwest client and the SQLite store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use formaloo_core::catalog::FormCatalog;
use formaloo_core::submission::SubmissionService;
use formaloo_core::webhook::lifecycle::WebhookLifecycle;
use formaloo_core::webhook::receiver::WebhookReceiver;
use formaloo_infra::config::{load_config, resolve_data_dir};
use formaloo_infra::http::FormalooHttpClient;
use formaloo_infra::sqlite::pool::{DatabasePool, database_url};
use formaloo_infra::sqlite::state::SqliteStateStore;
use formaloo_types::config::BridgeConfig;
use formaloo_types::credential::Credential;

pub type ConcreteCatalog = FormCatalog<FormalooHttpClient>;
pub type ConcreteSubmissionService = SubmissionService<FormalooHttpClient>;
pub type ConcreteLifecycle = WebhookLifecycle<FormalooHttpClient, SqliteStateStore>;
pub type ConcreteReceiver = WebhookReceiver<SqliteStateStore>;

/// Shared application state, used by CLI commands and the webhook server.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BridgeConfig>,
    pub api: Arc<FormalooHttpClient>,
    pub catalog: Arc<ConcreteCatalog>,
    pub submissions: Arc<ConcreteSubmissionService>,
    pub lifecycle: Arc<ConcreteLifecycle>,
    pub receiver: Arc<ConcreteReceiver>,
    pub state_store: Arc<SqliteStateStore>,
}

impl AppState {
    /// Load configuration, open the state database and wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;

        let db_url = format!("{}?mode=rwc", database_url(&data_dir));
        let db_pool = DatabasePool::new(&db_url)
            .await
            .context("failed to open state database")?;
        let state_store = Arc::new(SqliteStateStore::new(db_pool));

        let api = Arc::new(FormalooHttpClient::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?);
        let catalog = Arc::new(FormCatalog::new(
            api.clone(),
            config.page_size,
            config.max_pages,
        ));
        let submissions = SubmissionService::new(catalog.clone());
        let lifecycle = WebhookLifecycle::new(
            api.clone(),
            state_store.clone(),
            config.webhook_title_prefix.clone(),
        );
        let receiver = WebhookReceiver::new(state_store.clone());

        tracing::debug!(base_url = %config.base_url, data_dir = %data_dir.display(), "application state ready");

        Ok(Self {
            config: Arc::new(config),
            api,
            catalog,
            submissions: Arc::new(submissions),
            lifecycle: Arc::new(lifecycle),
            receiver: Arc::new(receiver),
            state_store,
        })
    }

    /// The configured credential, or an error explaining how to provide one.
    pub fn credential(&self) -> anyhow::Result<Credential> {
        self.config
            .credentials
            .as_ref()
            .map(|c| c.to_credential())
            .context(
                "no Formaloo credentials configured; add [credentials] to config.toml or set \
                 FORMALOO_API_KEY and FORMALOO_SECRET_API",
            )
    }
}
