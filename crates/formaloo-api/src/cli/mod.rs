//! CLI command definitions for the `formaloo` binary.
//!
//! Uses clap derive macros for argument parsing. Commands are grouped by
//! resource (`forms list`, `fields options`, `trigger create`).

pub mod auth;
pub mod fields;
pub mod forms;
pub mod submit;
pub mod trigger;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use serde::Serialize;

/// Browse, submit to and watch Formaloo forms.
#[derive(Parser)]
#[command(name = "formaloo", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Credential checks.
    Auth {
        #[command(subcommand)]
        action: auth::AuthCommand,
    },

    /// Browse forms and their fields.
    Forms {
        #[command(subcommand)]
        action: forms::FormsCommand,
    },

    /// Inspect field options and geography lookups.
    Fields {
        #[command(subcommand)]
        action: fields::FieldsCommand,
    },

    /// Submit one entry to a form, or a batch from a JSON file.
    Submit(submit::SubmitArgs),

    /// Manage the webhook registration of a trigger instance.
    Trigger {
        #[command(subcommand)]
        action: trigger::TriggerCommand,
    },

    /// Run the webhook receiver.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A table with the shared preset and a white header row.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["formaloo", "forms", "list", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }
}
