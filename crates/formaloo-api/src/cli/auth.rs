//! `formaloo auth` subcommands.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use formaloo_core::auth::verify_credentials;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Check that the configured credentials can authenticate.
    Test,
}

pub async fn handle_auth_command(cmd: AuthCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        AuthCommand::Test => auth_test(state, json).await,
    }
}

async fn auth_test(state: &AppState, json: bool) -> Result<()> {
    let credential = state.credential()?;
    let result = verify_credentials(state.api.as_ref(), &credential).await;

    if json {
        let out = match &result {
            Ok(()) => serde_json::json!({"ok": true, "kind": credential.kind()}),
            Err(e) => serde_json::json!({"ok": false, "kind": credential.kind(), "error": e.to_string()}),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        match &result {
            Ok(()) => println!(
                "  {} Authenticated with {} credentials",
                style("✓").green(),
                style(credential.kind()).cyan()
            ),
            Err(e) => println!("  {} {}", style("✗").red(), e),
        }
        println!();
    }

    result.map_err(Into::into)
}
