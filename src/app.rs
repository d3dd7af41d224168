use std::sync::Arc;

use crate::api::{NotificationApi, ProjectApi, TaskApi, UserApi};
use crate::config::ServiceConfig;
use crate::gateway::{LoginRedirect, RequestGateway};
use crate::session::Session;
use crate::storage::{FileStore, MemoryStore, SharedStore};
use crate::store::{NotificationStore, ResourceStore};

/// Fully wired client: one gateway per backend service, the session, and
/// one store per resource kind. Tasks and projects share the
/// task-service gateway.
pub struct App {
    pub session: Session,
    pub users: UserApi,
    pub tasks: ResourceStore<TaskApi>,
    pub projects: ResourceStore<ProjectApi>,
    pub notifications: NotificationStore<NotificationApi>,
}

impl App {
    pub fn new(
        config: &ServiceConfig,
        durable: SharedStore,
        ephemeral: SharedStore,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Self {
        let user_gateway = RequestGateway::new(
            config.user_service_url.as_str(),
            durable.clone(),
            ephemeral.clone(),
            redirect.clone(),
        );
        let task_gateway = RequestGateway::new(
            config.task_service_url.as_str(),
            durable.clone(),
            ephemeral.clone(),
            redirect.clone(),
        );
        let notification_gateway = RequestGateway::new(
            config.notification_service_url.as_str(),
            durable.clone(),
            ephemeral.clone(),
            redirect,
        );

        let users = UserApi::new(user_gateway);
        let session = Session::new(users.clone(), durable, ephemeral);

        Self {
            session,
            users,
            tasks: ResourceStore::new(TaskApi::new(task_gateway.clone())),
            projects: ResourceStore::new(ProjectApi::new(task_gateway)),
            notifications: NotificationStore::new(NotificationApi::new(notification_gateway)),
        }
    }

    /// Environment-driven wiring with the durable tier on disk; used by
    /// the CLI.
    pub fn from_env(redirect: Arc<dyn LoginRedirect>) -> anyhow::Result<Self> {
        let durable: SharedStore = Arc::new(FileStore::open()?);
        let ephemeral: SharedStore = Arc::new(MemoryStore::new());
        Ok(Self::new(crate::config::config(), durable, ephemeral, redirect))
    }
}
