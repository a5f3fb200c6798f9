//! # ob-cli
//!
//! Terminal front-end for the onboarding wizard: loads configuration, sets up
//! tracing, wires adapters into the use cases and runs one subcommand.

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod terminal;

use std::sync::Arc;

use tracing::{info, warn};

use bootstrap::wiring::ProgressMode;
pub use cli::{AdminAction, Cli, Command};
use terminal::{Prompt, TerminalConfirmation};

const LOG_DIR_NAME: &str = "logs";

/// Entry point used by the `onboard` binary.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = bootstrap::resolve_config(cli.config.as_deref())?;

    if let Err(err) = bootstrap::init_tracing_subscriber(&config.progress.dir.join(LOG_DIR_NAME)) {
        eprintln!("Failed to initialize tracing: {err}");
    }
    info!(api = %config.api.base_url, "onboard starting");

    let prompt = Arc::new(Prompt::stdio());

    match cli.command {
        Command::Wizard { ephemeral } => {
            let mode = if ephemeral {
                ProgressMode::Ephemeral
            } else {
                ProgressMode::Durable
            };
            let confirmation = Arc::new(TerminalConfirmation::new(prompt.clone()));
            let wizard = bootstrap::wizard_orchestrator(&config, mode, confirmation)?;
            commands::run_wizard(&wizard, &prompt).await?;
        }
        Command::Admin { action } => {
            let editor = bootstrap::admin_editor(&config)?;
            match action {
                AdminAction::Show => commands::admin::show(&editor, &prompt).await?,
                AdminAction::Move { group, step } => {
                    commands::admin::move_group(&editor, &prompt, group, step).await?
                }
            }
        }
        Command::Users { watch } => {
            let viewer = bootstrap::data_viewer(&config)?;
            if watch {
                let ctrl_c = async {
                    if let Err(err) = tokio::signal::ctrl_c().await {
                        warn!(error = %err, "failed to listen for Ctrl-C");
                        std::future::pending::<()>().await;
                    }
                };
                commands::users::watch(&viewer, &prompt, ctrl_c).await?;
            } else {
                commands::users::list(&viewer, &prompt).await?;
            }
        }
    }

    Ok(())
}
