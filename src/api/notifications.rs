use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ClientError;
use crate::gateway::RequestGateway;
use crate::models::Notification;
use crate::store::{ResourceClient, Unsupported};

/// Thin adapter over the notification-service endpoints. Notifications
/// are created server-side; the client only lists and marks them read.
#[derive(Clone)]
pub struct NotificationApi {
    gateway: RequestGateway,
}

impl NotificationApi {
    pub fn new(gateway: RequestGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ResourceClient for NotificationApi {
    type Item = Notification;
    type Filter = bool;
    type CreateInput = Unsupported;
    type UpdateInput = ();

    async fn list(&self, unread_only: bool) -> Result<Vec<Notification>, ClientError> {
        self.gateway
            .get_with_query(
                "/api/v1/notifications",
                &[("unread_only", unread_only.to_string())],
            )
            .await
    }

    async fn create(&self, input: Unsupported) -> Result<Notification, ClientError> {
        match input {}
    }

    async fn update(&self, id: Uuid, _input: ()) -> Result<Notification, ClientError> {
        self.gateway
            .post_empty(&format!("/api/v1/notifications/{}/read", id))
            .await
    }
}
