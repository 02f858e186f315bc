//! Catalog client: forms, form fields and field choice options.
//!
//! Wraps the raw [`FormalooApi`] listing endpoints with the filtering rules
//! the pickers and the field resolver rely on: empty-slug forms are dropped,
//! structural fields and fields without a title or slug are hidden, and the
//! forms listing follows `next` until the API stops indicating more pages.

pub mod geography;

use std::sync::Arc;

use formaloo_types::credential::AuthContext;
use formaloo_types::error::FormalooError;
use formaloo_types::form::{
    ChoiceOption, Field, FieldOption, FieldType, Form, FormListQuery, FormOption, FormSearchItem,
    FormSearchPage,
};

use crate::api::FormalooApi;

/// Read-only access to forms, fields and options.
pub struct FormCatalog<A> {
    api: Arc<A>,
    page_size: u32,
    max_pages: u32,
}

impl<A: FormalooApi> FormCatalog<A> {
    pub fn new(api: Arc<A>, page_size: u32, max_pages: u32) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// All forms of the account, across pages.
    pub async fn list_forms(&self, auth: &AuthContext) -> Result<Vec<Form>, FormalooError> {
        let mut forms = Vec::new();
        let mut page = 1;

        loop {
            let query = FormListQuery {
                page,
                page_size: self.page_size,
                search: None,
            };
            let result = self.api.list_forms(auth, &query).await?;
            tracing::debug!(page, count = result.forms.len(), has_next = result.has_next, "fetched forms page");

            forms.extend(
                result
                    .forms
                    .into_iter()
                    .filter(|form| !form.slug.trim().is_empty()),
            );

            if !result.has_next {
                break;
            }
            if page >= self.max_pages {
                tracing::warn!(max_pages = self.max_pages, "forms listing truncated at page limit");
                break;
            }
            page += 1;
        }

        Ok(forms)
    }

    /// `name`/`value` pairs for a form picker (`"title - slug"` / slug).
    pub async fn form_options(&self, auth: &AuthContext) -> Result<Vec<FormOption>, FormalooError> {
        let forms = self.list_forms(auth).await?;
        Ok(forms
            .into_iter()
            .map(|form| FormOption {
                name: format!("{} - {}", form.title, form.slug),
                value: form.slug,
            })
            .collect())
    }

    /// One page of a searchable form list.
    ///
    /// The filter is sent to the API and also applied locally as a
    /// case-insensitive substring match on title or slug. The continuation
    /// token is the next page number, present only when the API reports one.
    pub async fn search_forms(
        &self,
        auth: &AuthContext,
        filter: Option<&str>,
        pagination_token: Option<&str>,
    ) -> Result<FormSearchPage, FormalooError> {
        let page = match pagination_token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token.parse::<u32>().ok().filter(|p| *p >= 1).ok_or_else(|| {
                FormalooError::Validation(format!("invalid pagination token '{token}'"))
            })?,
            None => 1,
        };
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());

        let query = FormListQuery {
            page,
            page_size: self.page_size,
            search: filter.map(str::to_string),
        };
        let result = self.api.list_forms(auth, &query).await?;

        let needle = filter.map(str::to_lowercase);
        let results = result
            .forms
            .into_iter()
            .filter(|form| !form.slug.trim().is_empty())
            .filter(|form| match &needle {
                Some(needle) => {
                    form.title.to_lowercase().contains(needle)
                        || form.slug.to_lowercase().contains(needle)
                }
                None => true,
            })
            .map(|form| FormSearchItem {
                name: format!("{} - {}", form.title, form.slug),
                url: self.api.form_url(&form.slug),
                value: form.slug,
            })
            .collect();

        Ok(FormSearchPage {
            results,
            pagination_token: result.has_next.then(|| (page + 1).to_string()),
        })
    }

    /// Submittable fields of a form.
    ///
    /// Structural types are excluded regardless of title/slug presence, and so
    /// is any entry missing a title or slug.
    pub async fn get_form_fields(
        &self,
        auth: &AuthContext,
        form_slug: &str,
    ) -> Result<Vec<Field>, FormalooError> {
        let records = self.api.form_fields(auth, form_slug).await?;
        let total = records.len();

        let fields: Vec<Field> = records
            .into_iter()
            .filter_map(|record| {
                let field_type = FieldType::from(record.field_type.as_deref().unwrap_or_default());
                if field_type.is_structural() {
                    return None;
                }
                let slug = record.slug.filter(|s| !s.trim().is_empty())?;
                let title = record.title.filter(|t| !t.trim().is_empty())?;
                Some(Field {
                    slug,
                    title,
                    field_type,
                })
            })
            .collect();

        tracing::debug!(form_slug, total, kept = fields.len(), "loaded form fields");
        Ok(fields)
    }

    /// Field picker options (`"title - type"` / field reference).
    ///
    /// An empty form identifier yields no options rather than an error.
    pub async fn field_options(
        &self,
        auth: &AuthContext,
        form_slug: &str,
    ) -> Result<Vec<FieldOption>, FormalooError> {
        if form_slug.trim().is_empty() {
            return Ok(Vec::new());
        }
        let fields = self.get_form_fields(auth, form_slug).await?;
        Ok(fields
            .into_iter()
            .map(|field| FieldOption {
                name: format!("{} - {}", field.title, field.field_type),
                value: field.reference(),
            })
            .collect())
    }

    /// Choice options of a dropdown/choice/multi-select field.
    pub async fn get_field_options(
        &self,
        auth: &AuthContext,
        field_slug: &str,
    ) -> Result<Vec<ChoiceOption>, FormalooError> {
        if field_slug.trim().is_empty() {
            return Ok(Vec::new());
        }
        let options = self.api.field_choices(auth, field_slug).await?;
        tracing::debug!(field_slug, count = options.len(), "loaded field options");
        Ok(options)
    }
}
