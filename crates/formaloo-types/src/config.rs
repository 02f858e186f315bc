//! Configuration types for the Formaloo bridge.
//!
//! `BridgeConfig` represents the `config.toml` in the data directory. All
//! fields have defaults; credentials may also come from the environment.

use serde::{Deserialize, Serialize};

use crate::credential::Credential;

pub const DEFAULT_BASE_URL: &str = "https://api.formaloo.me";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// API origin, without a version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page size for the forms listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched by a full forms listing.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// HTTP client timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Title prefix for remote webhook registrations (`"{prefix} on {event}"`).
    #[serde(default = "default_webhook_title_prefix")]
    pub webhook_title_prefix: String,

    /// Public origin under which `formaloo serve` is reachable, used to build
    /// webhook callback URLs.
    #[serde(default)]
    pub public_url: Option<String>,

    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    25
}

fn default_max_pages() -> u32 {
    40
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_webhook_title_prefix() -> String {
    "automation workflow".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            timeout_secs: default_timeout_secs(),
            webhook_title_prefix: default_webhook_title_prefix(),
            public_url: None,
            credentials: None,
        }
    }
}

/// Credentials as written in `config.toml`, tagged by `kind`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialsConfig {
    SelfIssued {
        api_key: String,
        secret_api: String,
    },
    PreIssued {
        auth_token: String,
        api_key: String,
        workspace: String,
    },
}

impl CredentialsConfig {
    pub fn to_credential(&self) -> Credential {
        match self {
            CredentialsConfig::SelfIssued {
                api_key,
                secret_api,
            } => Credential::self_issued(api_key.clone(), secret_api.clone()),
            CredentialsConfig::PreIssued {
                auth_token,
                api_key,
                workspace,
            } => Credential::pre_issued(auth_token.clone(), api_key.clone(), workspace.clone()),
        }
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsConfig::SelfIssued { .. } => write!(f, "CredentialsConfig::SelfIssued(***)"),
            CredentialsConfig::PreIssued { workspace, .. } => {
                write!(f, "CredentialsConfig::PreIssued(workspace: {workspace:?}, ***)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = BridgeConfig::default();
        assert_eq!(config.base_url, "https://api.formaloo.me");
        assert_eq!(config.page_size, 25);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_parse_pre_issued_credentials() {
        let config: BridgeConfig = toml::from_str(
            r#"
page_size = 100

[credentials]
kind = "pre_issued"
auth_token = "tok"
api_key = "key"
workspace = "acme"
"#,
        )
        .unwrap();

        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_pages, 40);
        let cred = config.credentials.unwrap().to_credential();
        assert_eq!(cred.kind(), "pre_issued");
    }

    #[test]
    fn test_debug_hides_credential_values() {
        let cfg = CredentialsConfig::SelfIssued {
            api_key: "key-123456".into(),
            secret_api: "sec-abcdef".into(),
        };
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("123456"));
        assert!(!debug.contains("abcdef"));
    }
}
