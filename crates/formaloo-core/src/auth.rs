//! Token provider: resolves a [`Credential`] into an [`AuthContext`].

use secrecy::{ExposeSecret, SecretString};

use formaloo_types::credential::{AuthContext, Credential};
use formaloo_types::error::FormalooError;

use crate::api::FormalooApi;

/// Fail with `Authentication` when any required credential field is empty.
///
/// No network access; used before other validation so that a bad credential
/// is reported without side effects.
pub fn ensure_complete(credential: &Credential) -> Result<(), FormalooError> {
    let missing = credential.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(FormalooError::Authentication(format!(
            "missing required credentials ({}). Please check your Formaloo API credentials",
            missing.join(", ")
        )))
    }
}

/// Resolve headers for one operation.
///
/// Self-issued credentials trigger a token exchange on every call; the token
/// is not cached across operations.
pub async fn authenticate<A: FormalooApi>(
    api: &A,
    credential: &Credential,
) -> Result<AuthContext, FormalooError> {
    ensure_complete(credential)?;

    match credential {
        Credential::SelfIssued {
            api_key,
            secret_api,
        } => {
            let token = api.issue_token(secret_api).await.map_err(|e| match e {
                FormalooError::Authentication(_) => e,
                other => FormalooError::Authentication(other.to_string()),
            })?;
            if token.trim().is_empty() {
                return Err(FormalooError::Authentication(
                    "token endpoint returned an empty authorization_token".to_string(),
                ));
            }
            tracing::debug!(kind = credential.kind(), "issued Formaloo bearer token");
            Ok(AuthContext {
                token: SecretString::from(token),
                api_key: SecretString::from(api_key.expose_secret().to_string()),
                workspace: None,
            })
        }
        Credential::PreIssued {
            auth_token,
            api_key,
            workspace,
        } => Ok(AuthContext {
            token: SecretString::from(auth_token.expose_secret().to_string()),
            api_key: SecretString::from(api_key.expose_secret().to_string()),
            workspace: Some(workspace.clone()),
        }),
    }
}

/// Credential test: succeeds when `authenticate` does.
pub async fn verify_credentials<A: FormalooApi>(
    api: &A,
    credential: &Credential,
) -> Result<(), FormalooError> {
    authenticate(api, credential).await.map(|_| ())
}
