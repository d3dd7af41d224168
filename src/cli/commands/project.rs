use clap::Subcommand;
use serde_json::json;

use crate::api::projects::CreateProjectRequest;
use crate::app::App;
use crate::cli::utils::{output_error, output_items, output_success};
use crate::cli::OutputFormat;
use crate::models::Project;

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List projects")]
    List,

    #[command(about = "Create a project")]
    Create {
        #[arg(help = "Project name")]
        name: String,
        #[arg(long, help = "Project description")]
        description: Option<String>,
    },
}

pub async fn handle(
    cmd: ProjectCommands,
    app: &App,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ProjectCommands::List => {
            app.projects.fetch(()).await;

            if let Some(error) = app.projects.error() {
                output_error(&output_format, &error)?;
                std::process::exit(1);
            }

            output_items(&output_format, "projects", &app.projects.items(), render_project)
        }
        ProjectCommands::Create { name, description } => {
            let mut request = CreateProjectRequest::new(name);
            request.description = description;

            let project = app.projects.create(request).await?;
            output_success(
                &output_format,
                &format!("Created project '{}'", project.name),
                Some(json!({ "project": project })),
            )
        }
    }
}

fn render_project(project: &Project) -> String {
    match &project.description {
        Some(description) => format!("{}  {}  - {}", project.id, project.name, description),
        None => format!("{}  {}", project.id, project.name),
    }
}
