use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ClientError;
use crate::gateway::RequestGateway;
use crate::models::Project;
use crate::store::ResourceClient;

#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateProjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Thin adapter over the task-service project endpoints.
#[derive(Clone)]
pub struct ProjectApi {
    gateway: RequestGateway,
}

impl ProjectApi {
    pub fn new(gateway: RequestGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ResourceClient for ProjectApi {
    type Item = Project;
    type Filter = ();
    type CreateInput = CreateProjectRequest;
    type UpdateInput = UpdateProjectRequest;

    async fn list(&self, _filter: ()) -> Result<Vec<Project>, ClientError> {
        self.gateway.get("/api/v1/projects").await
    }

    async fn create(&self, input: CreateProjectRequest) -> Result<Project, ClientError> {
        if input.name.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "Project name cannot be empty".to_string(),
            ));
        }
        self.gateway.post("/api/v1/projects", &input).await
    }

    async fn update(&self, id: Uuid, input: UpdateProjectRequest) -> Result<Project, ClientError> {
        self.gateway
            .put(&format!("/api/v1/projects/{}", id), &input)
            .await
    }
}
