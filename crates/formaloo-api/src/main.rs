//! Formaloo bridge CLI and webhook server entry point.
//!
//! Binary name: `formaloo`
//!
//! Parses CLI arguments, loads configuration and the trigger state database,
//! then dispatches to the command handler or starts the webhook receiver.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags
    let level = log_filter(cli.verbose, cli.quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "formaloo", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Auth { action } => {
            cli::auth::handle_auth_command(action, &state, cli.json).await?;
        }

        Commands::Forms { action } => {
            cli::forms::handle_forms_command(action, &state, cli.json).await?;
        }

        Commands::Fields { action } => {
            cli::fields::handle_fields_command(action, &state, cli.json).await?;
        }

        Commands::Submit(args) => {
            cli::submit::handle_submit(args, &state, cli.json).await?;
        }

        Commands::Trigger { action } => {
            cli::trigger::handle_trigger_command(action, &state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            // stdout carries the event stream, so the banner goes to stderr
            eprintln!(
                "  {} Webhook receiver listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}/webhook/<instance_id>")).cyan()
            );
            eprintln!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            eprintln!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Default filter directives for the `-v` count.
fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,formaloo=debug,formaloo_core=debug,formaloo_infra=debug",
        _ => "trace",
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
