pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::gateway::LoginRedirect;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Taskdeck CLI - session and data client for the Taskdeck services")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Task operations")]
    Task {
        #[command(subcommand)]
        cmd: commands::task::TaskCommands,
    },

    #[command(about = "Project operations")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },

    #[command(about = "Notification operations")]
    Notification {
        #[command(subcommand)]
        cmd: commands::notification::NotificationCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Forced-expiry sink for a terminal client: there is no page to
/// navigate, so point the user at the login command instead.
pub struct CliRedirect;

impl LoginRedirect for CliRedirect {
    fn redirect_to_login(&self) {
        eprintln!("Session expired. Run 'taskdeck auth login <email>' to sign in again.");
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut app = App::from_env(Arc::new(CliRedirect))?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut app, output_format).await,
        Commands::Task { cmd } => commands::task::handle(cmd, &app, output_format).await,
        Commands::Project { cmd } => commands::project::handle(cmd, &app, output_format).await,
        Commands::Notification { cmd } => {
            commands::notification::handle(cmd, &app, output_format).await
        }
    }
}
