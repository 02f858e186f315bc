//! `formaloo forms` subcommands.

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Color};
use console::style;

use formaloo_core::auth::authenticate;
use formaloo_types::form::FormLocator;

use super::{new_table, print_json};
use crate::state::AppState;

#[derive(Subcommand)]
pub enum FormsCommand {
    /// List forms. With --search or --page, shows a single page of results.
    #[command(alias = "ls")]
    List {
        /// Filter by title or slug.
        #[arg(long)]
        search: Option<String>,

        /// Page to show (1-based).
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show the submittable fields of a form.
    Fields {
        /// Form slug or URL.
        form: String,
    },
}

pub async fn handle_forms_command(cmd: FormsCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        FormsCommand::List { search, page } => list_forms(state, search, page, json).await,
        FormsCommand::Fields { form } => form_fields(state, &form, json).await,
    }
}

async fn list_forms(
    state: &AppState,
    search: Option<String>,
    page: Option<u32>,
    json: bool,
) -> Result<()> {
    let credential = state.credential()?;
    let auth = authenticate(state.api.as_ref(), &credential).await?;

    if search.is_none() && page.is_none() {
        let forms = state.catalog.form_options(&auth).await?;
        if json {
            return print_json(&forms);
        }
        if forms.is_empty() {
            println!();
            println!("  {} No forms found", style("i").blue().bold());
            println!();
            return Ok(());
        }
        let mut table = new_table(&["Form", "Slug"]);
        for form in &forms {
            table.add_row(vec![
                Cell::new(&form.name),
                Cell::new(&form.value).fg(Color::Cyan),
            ]);
        }
        println!("{table}");
        println!("  {} form(s)", forms.len());
        return Ok(());
    }

    let token = page.map(|p| p.to_string());
    let result = state
        .catalog
        .search_forms(&auth, search.as_deref(), token.as_deref())
        .await?;

    if json {
        return print_json(&result);
    }
    let mut table = new_table(&["Form", "Slug", "URL"]);
    for item in &result.results {
        table.add_row(vec![
            Cell::new(&item.name),
            Cell::new(&item.value).fg(Color::Cyan),
            Cell::new(&item.url).fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");
    if let Some(next) = &result.pagination_token {
        println!(
            "  {}",
            style(format!("More results: --page {next}")).dim()
        );
    }
    Ok(())
}

async fn form_fields(state: &AppState, form: &str, json: bool) -> Result<()> {
    let form_slug = FormLocator::parse(form).slug();
    if form_slug.is_empty() {
        anyhow::bail!("Form is required");
    }

    let credential = state.credential()?;
    let auth = authenticate(state.api.as_ref(), &credential).await?;
    let options = state
        .catalog
        .field_options(&auth, &form_slug)
        .await
        .with_context(|| format!("failed to load fields of form '{form_slug}'"))?;

    if json {
        return print_json(&options);
    }

    let mut table = new_table(&["Field", "Reference"]);
    for option in &options {
        table.add_row(vec![
            Cell::new(&option.name),
            Cell::new(option.value.display_value()).fg(Color::Cyan),
        ]);
    }
    println!("{table}");
    println!(
        "  {}",
        style("Use the reference with `formaloo submit -f \"<reference>=<value>\"`").dim()
    );
    Ok(())
}
