//! Field resolver: turns a user-entered `(field reference, raw value)` row
//! into the submission key and value the API expects.

use std::sync::Arc;

use serde_json::Value;

use formaloo_types::credential::AuthContext;
use formaloo_types::error::FormalooError;
use formaloo_types::form::{ChoiceOption, FieldType};
use formaloo_types::submission::SubmissionRow;

use crate::api::FormalooApi;
use crate::catalog::FormCatalog;

pub struct FieldResolver<A> {
    catalog: Arc<FormCatalog<A>>,
}

impl<A: FormalooApi> FieldResolver<A> {
    pub fn new(catalog: Arc<FormCatalog<A>>) -> Self {
        Self { catalog }
    }

    /// Resolve one row. Rows without a slug resolve to `None` and are skipped.
    ///
    /// Choice-type fields consult the catalog; any lookup error is returned
    /// unchanged.
    pub async fn resolve(
        &self,
        auth: &AuthContext,
        row: &SubmissionRow,
    ) -> Result<Option<(String, Value)>, FormalooError> {
        let slug = row.field.slug.trim();
        if slug.is_empty() {
            return Ok(None);
        }

        let value = match &row.field.field_type {
            FieldType::Dropdown | FieldType::Choice => {
                let options = self.catalog.get_field_options(auth, slug).await?;
                let matched = match_option(&options, &row.value)
                    .ok_or_else(|| FormalooError::FieldOptionNotFound(row.value.clone()))?;
                Value::String(matched.slug.clone())
            }
            FieldType::MultipleSelect => {
                let options = self.catalog.get_field_options(auth, slug).await?;
                let slugs = match_multi(&options, &row.value);
                if slugs.is_empty() {
                    return Err(FormalooError::FieldOptionNotFound(row.value.clone()));
                }
                Value::Array(slugs.into_iter().map(Value::String).collect())
            }
            FieldType::City | FieldType::Country => {
                let matched = self
                    .catalog
                    .search_city_country(auth, slug, &row.value)
                    .await?;
                Value::String(matched.slug)
            }
            FieldType::Structural(_) | FieldType::Other(_) => Value::String(row.value.clone()),
        };

        tracing::debug!(field_slug = slug, field_type = %row.field.field_type, "resolved field value");
        Ok(Some((slug.to_string(), value)))
    }
}

/// First option whose title equals `value`, ignoring case.
pub fn match_option<'a>(options: &'a [ChoiceOption], value: &str) -> Option<&'a ChoiceOption> {
    let needle = value.to_lowercase();
    options
        .iter()
        .find(|option| option.title.to_lowercase() == needle)
}

/// Slugs for each comma-separated token that matches an option, in input
/// order. Tokens with no match are dropped.
pub fn match_multi(options: &[ChoiceOption], value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match_option(options, token))
        .map(|option| option.slug.clone())
        .collect()
}
