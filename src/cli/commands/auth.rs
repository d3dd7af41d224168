use clap::Subcommand;
use serde_json::json;

use crate::app::App;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and persist the session token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (reads TASKDECK_PASSWORD if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Register a new account and log in")]
    Register {
        #[arg(help = "Email address")]
        email: String,
        #[arg(help = "Full name")]
        full_name: String,
        #[arg(long, help = "Password (reads TASKDECK_PASSWORD if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Clear the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show the current user from the user service")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    app: &mut App,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            let user = app.session.login(&email, &password).await?;
            output_success(
                &output_format,
                &format!("Logged in as {}", user.email),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Register {
            email,
            full_name,
            password,
        } => {
            let password = resolve_password(password)?;
            let user = app.session.register(&email, &full_name, &password).await?;
            output_success(
                &output_format,
                &format!("Registered and logged in as {}", user.email),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Logout => {
            app.session.logout();
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let authenticated = app.session.is_authenticated();
            let has_token = app.session.token().is_some();
            output_success(
                &output_format,
                if authenticated {
                    "Authenticated"
                } else if has_token {
                    "Stored token present, not authenticated in this process"
                } else {
                    "Not authenticated"
                },
                Some(json!({
                    "authenticated": authenticated,
                    "has_token": has_token,
                })),
            )
        }
        AuthCommands::Whoami => {
            let user = app.users.me().await?;
            output_success(
                &output_format,
                &format!("{} <{}>", user.full_name, user.email),
                Some(json!({ "user": user })),
            )
        }
    }
}

fn resolve_password(provided: Option<String>) -> anyhow::Result<String> {
    match provided {
        Some(password) => Ok(password),
        None => std::env::var("TASKDECK_PASSWORD")
            .map_err(|_| anyhow::anyhow!("password required: pass --password or set TASKDECK_PASSWORD")),
    }
}
