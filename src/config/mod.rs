use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Base URLs for the three backend services the client talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub user_service_url: String,
    pub task_service_url: String,
    pub notification_service_url: String,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::default_local().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("TASKDECK_USER_SERVICE_URL") {
            self.user_service_url = normalize_base_url(&v).unwrap_or(self.user_service_url);
        }
        if let Ok(v) = env::var("TASKDECK_TASK_SERVICE_URL") {
            self.task_service_url = normalize_base_url(&v).unwrap_or(self.task_service_url);
        }
        if let Ok(v) = env::var("TASKDECK_NOTIFICATION_SERVICE_URL") {
            self.notification_service_url =
                normalize_base_url(&v).unwrap_or(self.notification_service_url);
        }
        self
    }

    fn default_local() -> Self {
        Self {
            user_service_url: "http://localhost:8001".to_string(),
            task_service_url: "http://localhost:8002".to_string(),
            notification_service_url: "http://localhost:8003".to_string(),
        }
    }
}

/// Parse and trim a base URL, rejecting values the HTTP client could not
/// use. Trailing slashes are dropped so paths can be appended verbatim.
fn normalize_base_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    Some(url.as_str().trim_end_matches('/').to_string())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<ServiceConfig> = Lazy::new(ServiceConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static ServiceConfig {
    &CONFIG
}
