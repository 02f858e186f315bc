//! `formaloo fields` subcommands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color};
use console::style;

use formaloo_core::auth::authenticate;
use formaloo_types::form::FieldRef;

use super::{new_table, print_json};
use crate::state::AppState;

#[derive(Subcommand)]
pub enum FieldsCommand {
    /// List the choice options of a dropdown, choice or multi-select field.
    Options {
        /// Field slug or `slug - type` reference.
        field: String,
    },

    /// Resolve a city or country name to a single option.
    Lookup {
        /// Field slug or `slug - type` reference.
        field: String,

        /// Name to search for.
        query: String,
    },
}

pub async fn handle_fields_command(cmd: FieldsCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        FieldsCommand::Options { field } => field_options(state, &field, json).await,
        FieldsCommand::Lookup { field, query } => lookup(state, &field, &query, json).await,
    }
}

async fn field_options(state: &AppState, field: &str, json: bool) -> Result<()> {
    let field = FieldRef::parse(field);
    let credential = state.credential()?;
    let auth = authenticate(state.api.as_ref(), &credential).await?;

    let options = state.catalog.get_field_options(&auth, &field.slug).await?;

    if json {
        return print_json(&options);
    }
    let mut table = new_table(&["Title", "Slug"]);
    for option in &options {
        table.add_row(vec![
            Cell::new(&option.title),
            Cell::new(&option.slug).fg(Color::Cyan),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn lookup(state: &AppState, field: &str, query: &str, json: bool) -> Result<()> {
    let field = FieldRef::parse(field);
    let credential = state.credential()?;
    let auth = authenticate(state.api.as_ref(), &credential).await?;

    let found = state
        .catalog
        .search_city_country(&auth, &field.slug, query)
        .await?;

    if json {
        return print_json(&found);
    }
    println!();
    println!(
        "  {} {} -> {}",
        style("✓").green(),
        style(&found.title).bold(),
        style(&found.slug).cyan()
    );
    println!();
    Ok(())
}
