//! Forms, fields, field references and choice options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator used by the composite `slug - type` field reference.
pub const FIELD_REF_SEPARATOR: &str = " - ";

/// Field types that carry structure rather than a submittable value.
pub const STRUCTURAL_FIELD_TYPES: [&str; 8] = [
    "success_page",
    "matrix",
    "table",
    "lookup",
    "user",
    "profile",
    "linked_rows",
    "repeating_section",
];

/// A form as listed by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One page of the forms listing.
#[derive(Debug, Clone, Default)]
pub struct FormPage {
    pub forms: Vec<Form>,
    /// Whether the API indicated a further page.
    pub has_next: bool,
}

/// Query parameters for one page of the forms listing.
#[derive(Debug, Clone)]
pub struct FormListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
}

/// Declared type of a form field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Dropdown,
    Choice,
    MultipleSelect,
    City,
    Country,
    /// Layout or relational types that cannot be submitted directly.
    Structural(String),
    /// Any plain value type (short_text, email, number, ...).
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Dropdown => "dropdown",
            FieldType::Choice => "choice",
            FieldType::MultipleSelect => "multiple_select",
            FieldType::City => "city",
            FieldType::Country => "country",
            FieldType::Structural(name) | FieldType::Other(name) => name,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, FieldType::Structural(_))
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        match value.trim() {
            "dropdown" => FieldType::Dropdown,
            "choice" => FieldType::Choice,
            "multiple_select" => FieldType::MultipleSelect,
            "city" => FieldType::City,
            "country" => FieldType::Country,
            other if STRUCTURAL_FIELD_TYPES.contains(&other) => {
                FieldType::Structural(other.to_string())
            }
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FieldType::from(raw.as_str()))
    }
}

/// A submittable field of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub slug: String,
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn reference(&self) -> FieldRef {
        FieldRef::new(self.slug.clone(), self.field_type.clone())
    }
}

/// A field entry exactly as the form detail endpoint returns it.
///
/// Title and slug are optional on the wire; entries missing either are
/// dropped by the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldRecord {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
}

/// Reference to a field carried alongside its display option.
///
/// Holds the slug and declared type as separate values. The composite
/// `"slug - type"` string is only a rendering of this pair, kept so that
/// references chosen in earlier configurations still parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub slug: String,
    pub field_type: FieldType,
}

impl FieldRef {
    pub fn new(slug: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            slug: slug.into(),
            field_type,
        }
    }

    /// A reference with no declared type; its value is submitted as-is.
    pub fn plain(slug: impl Into<String>) -> Self {
        Self::new(slug, FieldType::Other(String::new()))
    }

    /// Parse a composite reference.
    ///
    /// The type is taken from after the last separator so that a slug may
    /// itself contain `" - "`. Without a separator the whole (trimmed)
    /// reference is the slug and the field is plain.
    pub fn parse(reference: &str) -> Self {
        match reference.rsplit_once(FIELD_REF_SEPARATOR) {
            Some((slug, field_type)) => {
                Self::new(slug.trim(), FieldType::from(field_type.trim()))
            }
            None => Self::plain(reference.trim()),
        }
    }

    /// Composite display value, `slug - type`.
    pub fn display_value(&self) -> String {
        if self.field_type.as_str().is_empty() {
            self.slug.clone()
        } else {
            format!("{}{FIELD_REF_SEPARATOR}{}", self.slug, self.field_type)
        }
    }
}

impl FromStr for FieldRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldRef::parse(s))
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl Serialize for FieldRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display_value())
    }
}

impl<'de> Deserialize<'de> for FieldRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FieldRef::parse(&raw))
    }
}

/// One selectable option of a dropdown/choice/multi-select/geography field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub title: String,
    pub slug: String,
}

/// Result of a filtered choice search on a geography field.
#[derive(Debug, Clone, Default)]
pub struct ChoiceSearch {
    pub objects: Vec<ChoiceOption>,
    /// Total number of matches reported by the API (may exceed `objects.len()`).
    pub count: u64,
}

/// A `name`/`value` pair for option pickers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormOption {
    pub name: String,
    pub value: String,
}

/// A field offered to a user for selection, carrying its structured reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOption {
    pub name: String,
    pub value: FieldRef,
}

/// One result of the form list search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSearchItem {
    pub name: String,
    pub value: String,
    pub url: String,
}

/// A page of form search results with an opaque continuation token.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormSearchPage {
    pub results: Vec<FormSearchItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination_token: Option<String>,
}

/// How a user identified a form: by slug or by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormLocator {
    Id(String),
    Url(String),
}

impl FormLocator {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            FormLocator::Url(trimmed.to_string())
        } else {
            FormLocator::Id(trimmed.to_string())
        }
    }

    /// The form slug, or an empty string when none can be extracted.
    ///
    /// For URLs the slug is the path segment following `forms/`, or the last
    /// non-empty segment when the URL has no `forms/` component.
    pub fn slug(&self) -> String {
        match self {
            FormLocator::Id(slug) => slug.clone(),
            FormLocator::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or_default();
                let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
                let after_forms = segments
                    .iter()
                    .position(|s| *s == "forms")
                    .and_then(|i| segments.get(i + 1));
                match after_forms {
                    Some(slug) => slug.to_string(),
                    None if segments.len() > 2 => {
                        segments.last().map(|s| s.to_string()).unwrap_or_default()
                    }
                    None => String::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ref_parse_composite() {
        let r = FieldRef::parse("abc123 - dropdown ");
        assert_eq!(r.slug, "abc123");
        assert_eq!(r.field_type, FieldType::Dropdown);
    }

    #[test]
    fn test_field_ref_without_separator_is_plain() {
        let r = FieldRef::parse("  email_field ");
        assert_eq!(r.slug, "email_field");
        assert!(matches!(r.field_type, FieldType::Other(ref t) if t.is_empty()));
        assert_eq!(r.display_value(), "email_field");
    }

    #[test]
    fn test_field_ref_slug_may_contain_separator() {
        let r = FieldRef::parse("part - one - city");
        assert_eq!(r.slug, "part - one");
        assert_eq!(r.field_type, FieldType::City);
    }

    #[test]
    fn test_field_ref_serde_uses_composite_string() {
        let r = FieldRef::new("xyz", FieldType::MultipleSelect);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"xyz - multiple_select\"");
        let back: FieldRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_structural_types_detected() {
        for name in STRUCTURAL_FIELD_TYPES {
            assert!(FieldType::from(name).is_structural(), "{name}");
        }
        assert!(!FieldType::from("short_text").is_structural());
    }

    #[test]
    fn test_form_locator_from_api_url() {
        let loc = FormLocator::parse("https://api.formaloo.me/v3.0/forms/f9Xk2/");
        assert_eq!(loc.slug(), "f9Xk2");
    }

    #[test]
    fn test_form_locator_from_share_url() {
        let loc = FormLocator::parse("https://acme.formaloo.me/f9Xk2?ref=mail");
        assert_eq!(loc.slug(), "f9Xk2");
    }

    #[test]
    fn test_form_locator_id() {
        assert_eq!(FormLocator::parse(" abc ").slug(), "abc");
        assert_eq!(FormLocator::parse("").slug(), "");
    }
}
