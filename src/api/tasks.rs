use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ClientError;
use crate::gateway::RequestGateway;
use crate::models::{Task, TaskPriority, TaskStatus};
use crate::store::ResourceClient;

#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    pub priority: TaskPriority,
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            project_id: None,
            priority: TaskPriority::Medium,
        }
    }
}

/// Partial update; unset fields are not serialized and stay untouched
/// server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

/// Thin adapter over the task-service task endpoints.
#[derive(Clone)]
pub struct TaskApi {
    gateway: RequestGateway,
}

impl TaskApi {
    pub fn new(gateway: RequestGateway) -> Self {
        Self { gateway }
    }

    pub async fn list_all(&self) -> Result<Vec<Task>, ClientError> {
        self.gateway.get("/api/v1/tasks").await
    }

    pub async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, ClientError> {
        self.gateway
            .get(&format!("/api/v1/projects/{}/tasks", project_id))
            .await
    }
}

#[async_trait]
impl ResourceClient for TaskApi {
    type Item = Task;
    type Filter = Option<Uuid>;
    type CreateInput = CreateTaskRequest;
    type UpdateInput = UpdateTaskRequest;

    async fn list(&self, filter: Option<Uuid>) -> Result<Vec<Task>, ClientError> {
        match filter {
            Some(project_id) => self.list_by_project(project_id).await,
            None => self.list_all().await,
        }
    }

    async fn create(&self, input: CreateTaskRequest) -> Result<Task, ClientError> {
        if input.title.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "Task title cannot be empty".to_string(),
            ));
        }
        self.gateway.post("/api/v1/tasks", &input).await
    }

    async fn update(&self, id: Uuid, input: UpdateTaskRequest) -> Result<Task, ClientError> {
        self.gateway
            .put(&format!("/api/v1/tasks/{}", id), &input)
            .await
    }
}
