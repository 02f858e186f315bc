//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use formaloo_types::error::FormalooError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Domain errors, mapped by error code.
    Formaloo(FormalooError),
    /// Generic internal error.
    Internal(String),
}

impl From<FormalooError> for AppError {
    fn from(e: FormalooError) -> Self {
        AppError::Formaloo(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Formaloo(e) => match e {
                FormalooError::Validation(_)
                | FormalooError::FieldOptionNotFound(_)
                | FormalooError::AmbiguousMatch { .. } => StatusCode::BAD_REQUEST,
                FormalooError::NotFound { .. } => StatusCode::NOT_FOUND,
                FormalooError::Authentication(_) => StatusCode::UNAUTHORIZED,
                FormalooError::Transport(_)
                | FormalooError::Api { .. }
                | FormalooError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
                FormalooError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Formaloo(e) => e.code(),
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Formaloo(e) => e.to_string(),
            AppError::Internal(msg) => msg.clone(),
        };
        if status.is_server_error() {
            tracing::error!(code = self.code(), %message, "request failed");
        }

        let body = ApiResponse::error(self.code(), &message, String::new(), 0);
        let body = serde_json::to_string(&body).unwrap_or_else(|_| {
            r#"{"errors":[{"code":"SERIALIZATION_ERROR","message":"Failed to serialize response"}]}"#
                .to_string()
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formaloo_types::error::RepositoryError;

    #[test]
    fn test_status_mapping() {
        let validation: AppError = FormalooError::Validation("bad".into()).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.code(), "VALIDATION_ERROR");

        let upstream: AppError = FormalooError::Api {
            status: 503,
            message: "down".into(),
        }
        .into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let storage: AppError = FormalooError::Storage(RepositoryError::Connection).into();
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let internal = AppError::Internal("boom".into());
        assert_eq!(internal.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_into_response_uses_status() {
        let response = AppError::Formaloo(FormalooError::Authentication("no token".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
