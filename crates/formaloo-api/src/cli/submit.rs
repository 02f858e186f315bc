//! `formaloo submit`: single entries from flags, batches from a JSON file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use comfy_table::{Cell, Color};
use console::style;

use formaloo_types::form::FieldRef;
use formaloo_types::submission::{ItemOutcome, SubmissionMetadata, SubmissionRow, SubmitRequest};

use super::{new_table, print_json};
use crate::state::AppState;

#[derive(Args)]
pub struct SubmitArgs {
    /// Form slug or URL (omit when using --items).
    pub form: Option<String>,

    /// Field value as `<reference>=<value>`, e.g. `abc12 - dropdown=Red`.
    #[arg(short = 'f', long = "field")]
    pub fields: Vec<String>,

    #[arg(long)]
    pub submit_code: Option<String>,

    #[arg(long)]
    pub recaptcha_value: Option<String>,

    /// Submitter referer address.
    #[arg(long)]
    pub referer: Option<String>,

    /// Submit time, HH:MM:SS.
    #[arg(long)]
    pub submit_time: Option<String>,

    /// JSON file holding an array of submit requests.
    #[arg(long, conflicts_with_all = ["form", "fields"])]
    pub items: Option<PathBuf>,

    /// Record failing items and keep going instead of stopping.
    #[arg(long, requires = "items")]
    pub continue_on_fail: bool,
}

pub async fn handle_submit(args: SubmitArgs, state: &AppState, json: bool) -> Result<()> {
    let credential = state.credential()?;

    if let Some(path) = &args.items {
        let items = read_items(path).await?;
        let outcomes = state
            .submissions
            .execute_batch(&credential, &items, args.continue_on_fail)
            .await?;
        return print_outcomes(&outcomes, json);
    }

    let request = build_request(&args)?;
    let receipt = state.submissions.submit(&credential, &request).await?;

    if json {
        return print_json(&receipt);
    }
    println!();
    println!(
        "  {} Submitted {} value(s) to '{}'",
        style("✓").green(),
        receipt.submitted_data.len(),
        style(&receipt.form_slug).cyan()
    );
    println!();
    Ok(())
}

fn build_request(args: &SubmitArgs) -> Result<SubmitRequest> {
    let Some(form) = &args.form else {
        bail!("a form slug or URL is required (or use --items)");
    };
    let fields = args
        .fields
        .iter()
        .map(|raw| parse_field_arg(raw))
        .collect::<Result<Vec<_>>>()?;

    Ok(SubmitRequest {
        form: form.clone(),
        fields,
        metadata: SubmissionMetadata {
            submit_code: args.submit_code.clone(),
            recaptcha_value: args.recaptcha_value.clone(),
            submitter_referer_address: args.referer.clone(),
            submit_time: args.submit_time.clone(),
        },
    })
}

/// Split `<reference>=<value>` at the first `=`.
fn parse_field_arg(raw: &str) -> Result<SubmissionRow> {
    let (reference, value) = raw
        .split_once('=')
        .with_context(|| format!("invalid field '{raw}': expected <reference>=<value>"))?;
    Ok(SubmissionRow::new(FieldRef::parse(reference), value))
}

async fn read_items(path: &Path) -> Result<Vec<SubmitRequest>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of submit requests", path.display()))
}

fn print_outcomes(outcomes: &[ItemOutcome], json: bool) -> Result<()> {
    if json {
        return print_json(&outcomes);
    }

    let mut table = new_table(&["#", "Status", "Form", "Detail"]);
    for (index, outcome) in outcomes.iter().enumerate() {
        let row = match outcome {
            ItemOutcome::Submitted(receipt) => vec![
                Cell::new(index + 1),
                Cell::new("✓ submitted").fg(Color::Green),
                Cell::new(&receipt.form_slug),
                Cell::new(format!("{} value(s)", receipt.submitted_data.len())),
            ],
            ItemOutcome::Failed { error, .. } => vec![
                Cell::new(index + 1),
                Cell::new("✗ failed").fg(Color::Red),
                Cell::new(""),
                Cell::new(error),
            ],
        };
        table.add_row(row);
    }
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formaloo_types::form::FieldType;

    fn args(form: Option<&str>, fields: &[&str]) -> SubmitArgs {
        SubmitArgs {
            form: form.map(str::to_string),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            submit_code: None,
            recaptcha_value: None,
            referer: Some("https://example.com".to_string()),
            submit_time: None,
            items: None,
            continue_on_fail: false,
        }
    }

    #[test]
    fn test_parse_field_arg_keeps_equals_in_value() {
        let row = parse_field_arg("abc - short_text=a=b").unwrap();
        assert_eq!(row.field.slug, "abc");
        assert_eq!(row.field.field_type, FieldType::Other("short_text".to_string()));
        assert_eq!(row.value, "a=b");
    }

    #[test]
    fn test_parse_field_arg_requires_equals() {
        assert!(parse_field_arg("abc - dropdown").is_err());
    }

    #[test]
    fn test_build_request_maps_metadata() {
        let request = build_request(&args(Some("f1"), &["c1 - dropdown=Red"])).unwrap();
        assert_eq!(request.form, "f1");
        assert_eq!(request.fields[0].field.field_type, FieldType::Dropdown);
        assert_eq!(
            request.metadata.submitter_referer_address.as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_build_request_requires_form() {
        assert!(build_request(&args(None, &["x=1"])).is_err());
    }

    #[tokio::test]
    async fn test_read_items_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        tokio::fs::write(
            &path,
            r#"[{"form": "f1", "fields": [{"field": "c1 - dropdown", "value": "Red"}]}, {"form": "f2"}]"#,
        )
        .await
        .unwrap();

        let items = read_items(&path).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].fields[0].field.slug, "c1");
        assert!(items[1].fields.is_empty());
    }
}
