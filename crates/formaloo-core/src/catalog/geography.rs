//! City/country choice lookup.

use formaloo_types::credential::AuthContext;
use formaloo_types::error::{FormalooError, MAX_SUGGESTIONS};
use formaloo_types::form::{ChoiceOption, ChoiceSearch};

use crate::api::FormalooApi;

use super::FormCatalog;

impl<A: FormalooApi> FormCatalog<A> {
    /// Search a geography field's choices and pick exactly one option.
    pub async fn search_city_country(
        &self,
        auth: &AuthContext,
        field_slug: &str,
        search: &str,
    ) -> Result<ChoiceOption, FormalooError> {
        let search = search.trim();
        if field_slug.trim().is_empty() || search.is_empty() {
            return Err(FormalooError::not_found(search));
        }

        let result = self.api.search_choices(auth, field_slug, search).await?;
        tracing::debug!(field_slug, search, count = result.count, "geography search");
        select_match(search, result)
    }
}

/// Disambiguate a choice search.
///
/// One reported match wins outright. Otherwise only case-insensitive exact
/// title matches count: one is returned, several are ambiguous, none yields
/// a `NotFound` carrying up to [`MAX_SUGGESTIONS`] candidate titles.
pub fn select_match(search: &str, result: ChoiceSearch) -> Result<ChoiceOption, FormalooError> {
    let ChoiceSearch { mut objects, count } = result;
    if count == 0 || objects.is_empty() {
        return Err(FormalooError::not_found(search));
    }
    if count == 1 {
        return Ok(objects.swap_remove(0));
    }

    let needle = search.to_lowercase();
    let (mut exact, rest): (Vec<ChoiceOption>, Vec<ChoiceOption>) = objects
        .into_iter()
        .partition(|option| option.title.to_lowercase() == needle);

    match exact.len() {
        1 => Ok(exact.swap_remove(0)),
        0 => Err(FormalooError::NotFound {
            search: search.to_string(),
            suggestions: rest
                .into_iter()
                .take(MAX_SUGGESTIONS)
                .map(|option| option.title)
                .collect(),
            truncated: count > MAX_SUGGESTIONS as u64,
        }),
        _ => Err(FormalooError::AmbiguousMatch {
            search: search.to_string(),
            titles: exact.into_iter().map(|option| option.title).collect(),
        }),
    }
}
