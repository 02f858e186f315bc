//! `formaloo trigger` subcommands: webhook registration per trigger instance.

use anyhow::{Result, bail};
use clap::Subcommand;
use console::style;
use uuid::Uuid;

use formaloo_core::storage::state_store::InstanceStateStore;
use formaloo_types::webhook::WebhookEventType;

use super::print_json;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum TriggerCommand {
    /// Register a webhook for a form and remember it under the instance.
    Create {
        /// Trigger instance ID.
        #[arg(long)]
        instance: Uuid,

        /// Form slug or URL.
        #[arg(long)]
        form: String,

        /// form_submit, row_update, payment_completed or all.
        #[arg(long, default_value = "form_submit")]
        event: WebhookEventType,

        /// Callback URL. Defaults to `<public_url>/webhook/<instance>`.
        #[arg(long)]
        url: Option<String>,
    },

    /// Check whether the instance's webhook still exists remotely.
    Check {
        #[arg(long)]
        instance: Uuid,
    },

    /// Delete the instance's webhook and forget it.
    Delete {
        #[arg(long)]
        instance: Uuid,
    },

    /// Show what is stored for an instance.
    Show {
        #[arg(long)]
        instance: Uuid,
    },
}

pub async fn handle_trigger_command(
    cmd: TriggerCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        TriggerCommand::Create {
            instance,
            form,
            event,
            url,
        } => create(state, instance, &form, event, url, json).await,
        TriggerCommand::Check { instance } => check(state, instance, json).await,
        TriggerCommand::Delete { instance } => delete(state, instance, json).await,
        TriggerCommand::Show { instance } => show(state, instance, json).await,
    }
}

async fn create(
    state: &AppState,
    instance: Uuid,
    form: &str,
    event: WebhookEventType,
    url: Option<String>,
    json: bool,
) -> Result<()> {
    let callback_url = callback_url(url, state.config.public_url.as_deref(), &instance)?;
    let credential = state.credential()?;

    let registration = state
        .lifecycle
        .create(&credential, &instance, form, event, &callback_url)
        .await?;

    if json {
        return print_json(&serde_json::json!({
            "instance_id": instance,
            "callback_url": callback_url,
            "registration": registration,
        }));
    }
    println!();
    println!(
        "  {} Webhook '{}' registered on form '{}' for {}",
        style("✓").green(),
        style(&registration.remote_slug).cyan(),
        style(&registration.form_slug).cyan(),
        registration.event_type
    );
    println!("    {}", style(format!("Deliveries go to {callback_url}")).dim());
    println!();
    Ok(())
}

async fn check(state: &AppState, instance: Uuid, json: bool) -> Result<()> {
    let credential = state.credential()?;
    let exists = state.lifecycle.check_exists(&credential, &instance).await;

    if json {
        return print_json(&serde_json::json!({"instance_id": instance, "exists": exists}));
    }
    println!();
    if exists {
        println!("  {} Webhook is registered", style("✓").green());
    } else {
        println!("  {} No live webhook for this instance", style("✗").red());
    }
    println!();
    Ok(())
}

async fn delete(state: &AppState, instance: Uuid, json: bool) -> Result<()> {
    let credential = state.credential().ok();
    state.lifecycle.delete(credential.as_ref(), &instance).await;

    if json {
        return print_json(&serde_json::json!({"instance_id": instance, "deleted": true}));
    }
    println!();
    println!("  {} Webhook registration cleared", style("✓").green());
    println!();
    Ok(())
}

async fn show(state: &AppState, instance: Uuid, json: bool) -> Result<()> {
    let registration = state.lifecycle.registration(&instance).await?;
    let keys = state.state_store.list_keys(&instance).await?;

    if json {
        return print_json(&serde_json::json!({
            "instance_id": instance,
            "registration": registration,
            "keys": keys,
        }));
    }
    println!();
    println!("  Instance {}", style(instance).bold());
    match &registration {
        Some(r) => {
            println!("    Form:    {}", style(&r.form_slug).cyan());
            println!("    Webhook: {}", style(&r.remote_slug).cyan());
            println!("    Event:   {}", r.event_type);
        }
        None => println!("    {}", style("No webhook registered").dim()),
    }
    if !keys.is_empty() {
        println!("    Keys:    {}", keys.join(", "));
    }
    println!();
    Ok(())
}

/// The explicit URL, or `<public_url>/webhook/<instance>`.
fn callback_url(explicit: Option<String>, public_url: Option<&str>, instance: &Uuid) -> Result<String> {
    if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
        return Ok(url.trim().to_string());
    }
    match public_url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(base) => Ok(format!("{}/webhook/{instance}", base.trim_end_matches('/'))),
        None => bail!(
            "no callback URL: pass --url or set public_url in config.toml (or FORMALOO_PUBLIC_URL)"
        ),
    }
}
