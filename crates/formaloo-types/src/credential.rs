//! Formaloo credential shapes and the per-operation authentication context.
//!
//! A deployment uses exactly one of two mutually exclusive shapes. The shape
//! is resolved once, at the authentication boundary, into an [`AuthContext`].
//! Secret values are wrapped in [`SecretString`] and never appear in `Debug`
//! output.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// A configured Formaloo credential.
pub enum Credential {
    /// API key plus secret; a short-lived token is issued per operation.
    SelfIssued {
        api_key: SecretString,
        secret_api: SecretString,
    },
    /// A pre-issued token bound to a workspace.
    PreIssued {
        auth_token: SecretString,
        api_key: SecretString,
        workspace: String,
    },
}

impl Credential {
    pub fn self_issued(api_key: impl Into<String>, secret_api: impl Into<String>) -> Self {
        Credential::SelfIssued {
            api_key: SecretString::from(api_key.into()),
            secret_api: SecretString::from(secret_api.into()),
        }
    }

    pub fn pre_issued(
        auth_token: impl Into<String>,
        api_key: impl Into<String>,
        workspace: impl Into<String>,
    ) -> Self {
        Credential::PreIssued {
            auth_token: SecretString::from(auth_token.into()),
            api_key: SecretString::from(api_key.into()),
            workspace: workspace.into(),
        }
    }

    /// Short name of the credential shape, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::SelfIssued { .. } => "self_issued",
            Credential::PreIssued { .. } => "pre_issued",
        }
    }

    /// Names of the required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self {
            Credential::SelfIssued { api_key, secret_api } => {
                if api_key.expose_secret().trim().is_empty() {
                    missing.push("api_key");
                }
                if secret_api.expose_secret().trim().is_empty() {
                    missing.push("secret_api");
                }
            }
            Credential::PreIssued {
                auth_token,
                api_key,
                workspace,
            } => {
                if auth_token.expose_secret().trim().is_empty() {
                    missing.push("auth_token");
                }
                if api_key.expose_secret().trim().is_empty() {
                    missing.push("api_key");
                }
                if workspace.trim().is_empty() {
                    missing.push("workspace");
                }
            }
        }
        missing
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::SelfIssued { .. } => write!(f, "Credential::SelfIssued(***)"),
            Credential::PreIssued { workspace, .. } => {
                write!(f, "Credential::PreIssued(workspace: {workspace:?}, ***)")
            }
        }
    }
}

/// Headers derived from a credential for one operation.
///
/// Held for the duration of a single action or hook invocation; never cached
/// across operations and never persisted.
pub struct AuthContext {
    pub token: SecretString,
    pub api_key: SecretString,
    /// Only present for the pre-issued credential shape.
    pub workspace: Option<String>,
}

impl AuthContext {
    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("JWT {}", self.token.expose_secret())
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &"***")
            .field("api_key", &"***")
            .field("workspace", &self.workspace)
            .finish()
    }
}
