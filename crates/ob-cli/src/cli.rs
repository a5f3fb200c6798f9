use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ob_core::{ConfigurableStep, FieldGroupId};

#[derive(Debug, Parser)]
#[command(name = "onboard", version, about = "User onboarding wizard and admin tools")]
pub struct Cli {
    /// Config file; defaults to `<config dir>/onboard/config.toml` when present
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the registration wizard interactively
    Wizard {
        /// Keep progress in memory only; nothing is resumed or written to disk
        #[arg(long)]
        ephemeral: bool,
    },
    /// Inspect or rearrange the field-groups shown on steps 2 and 3
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Print the registered users table
    Users {
        /// Keep refreshing until Ctrl-C
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminAction {
    /// Print the current step configuration
    Show,
    /// Move a field-group to another step and save
    Move {
        /// ABOUT_ME, ADDRESS or BIRTHDATE
        group: FieldGroupId,
        /// Target step, 2 or 3
        step: ConfigurableStep,
    },
}
