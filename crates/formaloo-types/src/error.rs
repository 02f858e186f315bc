use thiserror::Error;

/// Maximum number of candidate titles listed in a geography `NotFound` error.
pub const MAX_SUGGESTIONS: usize = 10;

/// Errors produced by Formaloo operations.
///
/// Nested lookups propagate these unchanged up to the top-level operation.
#[derive(Debug, Error)]
pub enum FormalooError {
    /// Missing credentials or a failed token exchange.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The remote payload did not have the expected shape.
    #[error("invalid response from Formaloo API: {0}")]
    InvalidResponse(String),

    /// A dropdown/choice/multi-select value matched no option title.
    #[error("field option not found for value: {0}")]
    FieldOptionNotFound(String),

    /// More than one exact title match in a geography search.
    #[error("multiple exact matches found for \"{search}\": {}", .titles.join(", "))]
    AmbiguousMatch { search: String, titles: Vec<String> },

    /// A geography search found nothing usable.
    #[error("{}", render_not_found(.search, .suggestions, .truncated))]
    NotFound {
        search: String,
        suggestions: Vec<String>,
        truncated: bool,
    },

    /// Invalid caller input (missing form, empty body, malformed metadata).
    #[error("validation error: {0}")]
    Validation(String),

    /// The HTTP request could not be sent or its body not read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("Formaloo API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Instance-scoped state could not be read or written.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl FormalooError {
    /// `NotFound` for a term with no candidates at all.
    pub fn not_found(search: impl Into<String>) -> Self {
        FormalooError::NotFound {
            search: search.into(),
            suggestions: Vec::new(),
            truncated: false,
        }
    }

    /// Short machine-readable code, used in CLI JSON output and HTTP envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            FormalooError::Authentication(_) => "AUTHENTICATION_ERROR",
            FormalooError::InvalidResponse(_) => "INVALID_RESPONSE",
            FormalooError::FieldOptionNotFound(_) => "FIELD_OPTION_NOT_FOUND",
            FormalooError::AmbiguousMatch { .. } => "AMBIGUOUS_MATCH",
            FormalooError::NotFound { .. } => "NOT_FOUND",
            FormalooError::Validation(_) => "VALIDATION_ERROR",
            FormalooError::Transport(_) => "TRANSPORT_ERROR",
            FormalooError::Api { .. } => "API_ERROR",
            FormalooError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

fn render_not_found(search: &str, suggestions: &[String], truncated: &bool) -> String {
    if suggestions.is_empty() {
        return format!("no city/country found for search term: \"{search}\"");
    }
    format!(
        "no exact match found for \"{search}\". Available options include: {}{}",
        suggestions.join(", "),
        if *truncated { "..." } else { "" }
    )
}

/// Errors from the instance state store (used by trait definitions in formaloo-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_without_suggestions() {
        let err = FormalooError::not_found("Atlantis");
        assert_eq!(
            err.to_string(),
            "no city/country found for search term: \"Atlantis\""
        );
    }

    #[test]
    fn test_not_found_with_truncated_suggestions() {
        let err = FormalooError::NotFound {
            search: "par".to_string(),
            suggestions: vec!["Paris".to_string(), "Parma".to_string()],
            truncated: true,
        };
        assert!(err.to_string().ends_with("Paris, Parma..."));
    }

    #[test]
    fn test_ambiguous_match_lists_titles() {
        let err = FormalooError::AmbiguousMatch {
            search: "springfield".to_string(),
            titles: vec!["Springfield".to_string(), "springfield".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "multiple exact matches found for \"springfield\": Springfield, springfield"
        );
    }

    #[test]
    fn test_repository_error_converts() {
        let err: FormalooError = RepositoryError::Query("locked".to_string()).into();
        assert_eq!(err.code(), "STORAGE_ERROR");
        assert_eq!(err.to_string(), "query error: locked");
    }
}
