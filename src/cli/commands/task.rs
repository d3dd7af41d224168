use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::api::tasks::{CreateTaskRequest, UpdateTaskRequest};
use crate::app::App;
use crate::cli::utils::{output_error, output_items, output_success};
use crate::cli::OutputFormat;
use crate::models::Task;

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "List tasks, optionally scoped to a project")]
    List {
        #[arg(long, help = "Project id to scope the listing")]
        project: Option<String>,
    },

    #[command(about = "Create a task")]
    Create {
        #[arg(help = "Task title")]
        title: String,
        #[arg(long, help = "Task description")]
        description: Option<String>,
        #[arg(long, help = "Project id the task belongs to")]
        project: Option<String>,
        #[arg(long, help = "Priority: low, medium, high, urgent")]
        priority: Option<String>,
    },

    #[command(about = "Update fields on an existing task")]
    Update {
        #[arg(help = "Task id")]
        id: String,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[arg(long, help = "New description")]
        description: Option<String>,
        #[arg(long, help = "New status: todo, in_progress, done, cancelled")]
        status: Option<String>,
        #[arg(long, help = "New priority: low, medium, high, urgent")]
        priority: Option<String>,
        #[arg(long, help = "Move to project id")]
        project: Option<String>,
    },
}

pub async fn handle(cmd: TaskCommands, app: &App, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TaskCommands::List { project } => {
            let filter = project
                .map(|raw| raw.parse::<Uuid>().context("invalid project id"))
                .transpose()?;
            app.tasks.fetch(filter).await;

            if let Some(error) = app.tasks.error() {
                output_error(&output_format, &error)?;
                std::process::exit(1);
            }

            output_items(&output_format, "tasks", &app.tasks.items(), render_task)
        }
        TaskCommands::Create {
            title,
            description,
            project,
            priority,
        } => {
            let mut request = CreateTaskRequest::new(title);
            request.description = description;
            request.project_id = project
                .map(|raw| raw.parse::<Uuid>().context("invalid project id"))
                .transpose()?;
            if let Some(raw) = priority {
                request.priority = raw.parse()?;
            }

            let task = app.tasks.create(request).await?;
            output_success(
                &output_format,
                &format!("Created task '{}'", task.title),
                Some(json!({ "task": task })),
            )
        }
        TaskCommands::Update {
            id,
            title,
            description,
            status,
            priority,
            project,
        } => {
            let id = id.parse::<Uuid>().context("invalid task id")?;
            let request = UpdateTaskRequest {
                title,
                description,
                status: status.map(|raw| raw.parse()).transpose()?,
                priority: priority.map(|raw| raw.parse()).transpose()?,
                project_id: project
                    .map(|raw| raw.parse::<Uuid>().context("invalid project id"))
                    .transpose()?,
            };

            let task = app.tasks.update(id, request).await?;
            output_success(
                &output_format,
                &format!("Updated task '{}'", task.title),
                Some(json!({ "task": task })),
            )
        }
    }
}

fn render_task(task: &Task) -> String {
    format!(
        "{}  [{} / {}]  {}",
        task.id, task.status, task.priority, task.title
    )
}
