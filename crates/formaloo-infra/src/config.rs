//! Configuration loader for the Formaloo bridge.
//!
//! Reads `config.toml` from the data directory (`~/.formaloo-bridge/` by
//! default) and layers `FORMALOO_*` environment variables on top.

use std::path::{Path, PathBuf};

use formaloo_types::config::{BridgeConfig, CredentialsConfig};

pub const DATA_DIR_ENV: &str = "FORMALOO_DATA_DIR";
const DEFAULT_DIR_NAME: &str = ".formaloo-bridge";

/// `FORMALOO_DATA_DIR`, else `~/.formaloo-bridge`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Load `{data_dir}/config.toml` and apply environment overrides.
pub async fn load_config(data_dir: &Path) -> BridgeConfig {
    let config = load_config_file(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Parse the config file only.
///
/// A missing file yields defaults; an unreadable or malformed one is logged
/// and also yields defaults.
pub async fn load_config_file(data_dir: &Path) -> BridgeConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return BridgeConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return BridgeConfig::default();
        }
    };

    match toml::from_str::<BridgeConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
            BridgeConfig::default()
        }
    }
}

/// Apply `FORMALOO_*` overrides read through `lookup`.
///
/// `FORMALOO_AUTH_TOKEN` + `FORMALOO_API_KEY` + `FORMALOO_WORKSPACE` select a
/// pre-issued credential; otherwise `FORMALOO_API_KEY` + `FORMALOO_SECRET_API`
/// select a self-issued one. Partial sets leave the file credentials alone.
pub fn apply_env_overrides(
    mut config: BridgeConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> BridgeConfig {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(base_url) = var("FORMALOO_BASE_URL") {
        config.base_url = base_url;
    }
    if let Some(public_url) = var("FORMALOO_PUBLIC_URL") {
        config.public_url = Some(public_url);
    }

    let env_credentials = match (
        var("FORMALOO_AUTH_TOKEN"),
        var("FORMALOO_API_KEY"),
        var("FORMALOO_WORKSPACE"),
        var("FORMALOO_SECRET_API"),
    ) {
        (Some(auth_token), Some(api_key), Some(workspace), _) => {
            Some(CredentialsConfig::PreIssued {
                auth_token,
                api_key,
                workspace,
            })
        }
        (_, Some(api_key), _, Some(secret_api)) => Some(CredentialsConfig::SelfIssued {
            api_key,
            secret_api,
        }),
        _ => None,
    };
    if let Some(credentials) = env_credentials {
        tracing::debug!(?credentials, "using credentials from environment");
        config.credentials = Some(credentials);
    }

    config
}
