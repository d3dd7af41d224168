use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::app::App;
use crate::cli::utils::{output_error, output_items, output_success};
use crate::cli::OutputFormat;
use crate::models::Notification;

#[derive(Subcommand)]
pub enum NotificationCommands {
    #[command(about = "List notifications")]
    List {
        #[arg(long, help = "Only show unread notifications")]
        unread_only: bool,
    },

    #[command(about = "Mark a notification as read")]
    Read {
        #[arg(help = "Notification id")]
        id: String,
    },
}

pub async fn handle(
    cmd: NotificationCommands,
    app: &App,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        NotificationCommands::List { unread_only } => {
            app.notifications.fetch(unread_only).await;

            if let Some(error) = app.notifications.error() {
                output_error(&output_format, &error)?;
                std::process::exit(1);
            }

            let items = app.notifications.items();
            output_items(&output_format, "notifications", &items, render_notification)?;

            if matches!(output_format, OutputFormat::Text) {
                println!("{} unread", app.notifications.unread_count());
            }
            Ok(())
        }
        NotificationCommands::Read { id } => {
            let id = id.parse::<Uuid>().context("invalid notification id")?;
            let notification = app.notifications.mark_read(id).await?;
            output_success(
                &output_format,
                &format!("Marked '{}' as read", notification.title),
                Some(json!({ "notification": notification })),
            )
        }
    }
}

fn render_notification(notification: &Notification) -> String {
    let marker = if notification.read { " " } else { "*" };
    format!(
        "{} {}  [{}]  {}: {}",
        marker, notification.id, notification.kind, notification.title, notification.message
    )
}
