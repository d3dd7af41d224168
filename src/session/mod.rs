use chrono::Utc;

use crate::api::users::{LoginRequest, RegisterRequest, UserApi};
use crate::error::ClientError;
use crate::models::User;
use crate::storage::{SharedStore, LOGIN_TIME_KEY, TOKEN_KEY};

/// Single source of truth for "who is logged in". The only component that
/// mutates the token through its own lifecycle operations; a forced
/// expiry in the gateway clears storage without going through this
/// object, so its in-memory fields can go stale until the caller reacts.
pub struct Session {
    users: UserApi,
    durable: SharedStore,
    ephemeral: SharedStore,
    user: Option<User>,
    token: Option<String>,
}

impl Session {
    /// Restores the persisted token if one exists. The user identity is
    /// not persisted, so a restored session is not yet authenticated.
    pub fn new(users: UserApi, durable: SharedStore, ephemeral: SharedStore) -> Self {
        let token = durable.get(TOKEN_KEY);
        Self {
            users,
            durable,
            ephemeral,
            user: None,
            token,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// True iff both token and user identity are present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Authenticate and establish the session: token, identity, and the
    /// login timestamp are set together, and the token is persisted.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ClientError> {
        let grant = self
            .users
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.token = Some(grant.access_token.clone());
        self.user = Some(grant.user.clone());
        self.durable.set(TOKEN_KEY, &grant.access_token);
        self.ephemeral
            .set(LOGIN_TIME_KEY, &Utc::now().timestamp_millis().to_string());

        Ok(grant.user)
    }

    /// Registration alone does not establish a session: a successful
    /// registration is followed by the full login flow with the same
    /// credentials. If that login fails its error is surfaced and the
    /// account still exists server-side.
    pub async fn register(
        &mut self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        self.users
            .register(&RegisterRequest {
                email: email.to_string(),
                full_name: full_name.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.login(email, password).await
    }

    /// Clears the session and both storage entries. Idempotent.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.durable.remove(TOKEN_KEY);
        self.ephemeral.remove(LOGIN_TIME_KEY);
    }
}
