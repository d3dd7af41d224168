use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::gateway::RequestGateway;
use crate::models::User;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload: the bearer token plus the authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

/// Thin adapter over the user-service endpoints.
#[derive(Clone)]
pub struct UserApi {
    gateway: RequestGateway,
}

impl UserApi {
    pub fn new(gateway: RequestGateway) -> Self {
        Self { gateway }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ClientError> {
        self.gateway.post("/api/v1/auth/register", request).await
    }

    /// Exchange credentials for a bearer token. A 401 from this endpoint
    /// means the credentials were wrong, whatever the gateway made of it.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, ClientError> {
        match self.gateway.post("/api/v1/auth/login", request).await {
            Err(ClientError::SessionExpired) | Err(ClientError::Http { status: 401, .. }) => {
                Err(ClientError::InvalidCredentials)
            }
            other => other,
        }
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        self.gateway.get("/api/v1/users/me").await
    }
}
