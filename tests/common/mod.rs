use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use taskdeck::app::App;
use taskdeck::config::ServiceConfig;
use taskdeck::gateway::LoginRedirect;
use taskdeck::storage::MemoryStore;

pub const TEST_EMAIL: &str = "a@x.com";
pub const TEST_PASSWORD: &str = "pw";
pub const TEST_TOKEN: &str = "T1";

#[derive(Default)]
pub struct BackendState {
    pub tasks: Vec<Value>,
    pub projects: Vec<Value>,
    pub notifications: Vec<Value>,
    /// (email, password, user) triples accepted by the login endpoint in
    /// addition to the canned test account.
    pub registered: Vec<(String, String, Value)>,
    /// When set, every protected route answers 401.
    pub force_unauthorized: bool,
    /// When set, task listing answers 500.
    pub fail_tasks: bool,
    pub last_authorization: Option<String>,
    pub last_create_body: Option<Value>,
}

type Shared = Arc<Mutex<BackendState>>;

/// In-process mock of all three backend services, bound to an OS-assigned
/// port.
pub struct TestBackend {
    pub base_url: String,
    pub state: Shared,
}

impl TestBackend {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::default()));
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn force_unauthorized(&self, on: bool) {
        self.state.lock().unwrap().force_unauthorized = on;
    }

    pub fn fail_tasks(&self, on: bool) {
        self.state.lock().unwrap().fail_tasks = on;
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.lock().unwrap().last_authorization.clone()
    }

    pub fn last_create_body(&self) -> Option<Value> {
        self.state.lock().unwrap().last_create_body.clone()
    }

    pub fn task_count(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    pub fn seed_task(&self, title: &str, project_id: Option<Uuid>) -> Uuid {
        let id = Uuid::new_v4();
        let task = json!({
            "id": id,
            "title": title,
            "description": null,
            "status": "todo",
            "priority": "medium",
            "project_id": project_id,
            "assigned_to": null,
            "created_by": test_user_id(),
            "created_at": Utc::now(),
            "updated_at": null,
        });
        self.state.lock().unwrap().tasks.push(task);
        id
    }

    pub fn seed_notification(&self, title: &str, read: bool) -> Uuid {
        let id = Uuid::new_v4();
        let notification = json!({
            "id": id,
            "user_id": test_user_id(),
            "title": title,
            "message": format!("{} message", title),
            "type": "task_assigned",
            "read": read,
            "created_at": Utc::now(),
        });
        self.state.lock().unwrap().notifications.push(notification);
        id
    }
}

/// Redirect sink that counts invocations instead of navigating.
#[derive(Default)]
pub struct RecordingRedirect {
    hits: AtomicUsize,
}

impl RecordingRedirect {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect_to_login(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

/// The SDK wired against the mock backend with in-memory storage tiers.
pub struct TestApp {
    pub app: App,
    pub durable: Arc<MemoryStore>,
    pub ephemeral: Arc<MemoryStore>,
    pub redirect: Arc<RecordingRedirect>,
}

pub fn build_app(backend: &TestBackend) -> TestApp {
    let durable = Arc::new(MemoryStore::new());
    let ephemeral = Arc::new(MemoryStore::new());
    let redirect = Arc::new(RecordingRedirect::default());

    let config = ServiceConfig {
        user_service_url: backend.base_url.clone(),
        task_service_url: backend.base_url.clone(),
        notification_service_url: backend.base_url.clone(),
    };
    let app = App::new(
        &config,
        durable.clone(),
        ephemeral.clone(),
        redirect.clone(),
    );

    TestApp {
        app,
        durable,
        ephemeral,
        redirect,
    }
}

pub fn test_user_id() -> Uuid {
    Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap()
}

fn test_user() -> Value {
    json!({
        "id": test_user_id(),
        "email": TEST_EMAIL,
        "full_name": "Test User",
        "created_at": Utc::now(),
        "updated_at": null,
    })
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/users/me", get(me))
        .route("/api/v1/credentials", get(credentials))
        .route("/api/v1/tasks", get(list_tasks).post(create_task))
        .route("/api/v1/tasks/:id", put(update_task))
        .route("/api/v1/projects", get(list_projects).post(create_project))
        .route("/api/v1/projects/:id", put(update_project))
        .route("/api/v1/projects/:id/tasks", get(list_project_tasks))
        .route("/api/v1/notifications", get(list_notifications))
        .route(
            "/api/v1/notifications/:id/read",
            post(mark_notification_read),
        )
        .with_state(state)
}

type ApiError = (StatusCode, Json<Value>);

fn unauthorized() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Not authenticated"})),
    )
}

fn not_found(detail: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({"detail": detail})))
}

/// Records the Authorization header and enforces the bearer token.
fn authorize(state: &Shared, headers: &HeaderMap) -> Result<(), ApiError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut guard = state.lock().unwrap();
    guard.last_authorization = auth.clone();

    let expected = format!("Bearer {}", TEST_TOKEN);
    if guard.force_unauthorized || auth.as_deref() != Some(expected.as_str()) {
        return Err(unauthorized());
    }
    Ok(())
}

async fn register(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let user = json!({
        "id": Uuid::new_v4(),
        "email": email,
        "full_name": body["full_name"],
        "created_at": Utc::now(),
        "updated_at": null,
    });

    state
        .lock()
        .unwrap()
        .registered
        .push((email, password, user.clone()));
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let user = if email == TEST_EMAIL && password == TEST_PASSWORD {
        Some(test_user())
    } else {
        state
            .lock()
            .unwrap()
            .registered
            .iter()
            .find(|(e, p, _)| e == email && p == password)
            .map(|(_, _, user)| user.clone())
    };

    match user {
        Some(user) => Ok(Json(json!({
            "access_token": TEST_TOKEN,
            "token_type": "bearer",
            "user": user,
        }))),
        None => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect email or password"})),
        )),
    }
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    Ok(Json(test_user()))
}

/// Credential-probe endpoint used by password managers; always rejects.
async fn credentials() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Credentials endpoint is not available"})),
    )
}

async fn list_tasks(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let guard = state.lock().unwrap();
    if guard.fail_tasks {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "task service exploded"})),
        ));
    }
    Ok(Json(Value::Array(guard.tasks.clone())))
}

async fn create_task(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    authorize(&state, &headers)?;

    let task = json!({
        "id": Uuid::new_v4(),
        "title": body["title"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "status": "todo",
        "priority": body.get("priority").cloned().unwrap_or(json!("medium")),
        "project_id": body.get("project_id").cloned().unwrap_or(Value::Null),
        "assigned_to": null,
        "created_by": test_user_id(),
        "created_at": Utc::now(),
        "updated_at": null,
    });

    let mut guard = state.lock().unwrap();
    guard.last_create_body = Some(body);
    guard.tasks.push(task.clone());
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<Shared>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;

    let mut guard = state.lock().unwrap();
    let task = guard
        .tasks
        .iter_mut()
        .find(|t| t["id"] == json!(id))
        .ok_or_else(|| not_found("Task not found"))?;

    for field in ["title", "description", "status", "priority", "project_id"] {
        if let Some(value) = body.get(field) {
            if !value.is_null() {
                task[field] = value.clone();
            }
        }
    }
    task["updated_at"] = json!(Utc::now());
    Ok(Json(task.clone()))
}

async fn list_projects(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let guard = state.lock().unwrap();
    Ok(Json(Value::Array(guard.projects.clone())))
}

async fn create_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    authorize(&state, &headers)?;

    let project = json!({
        "id": Uuid::new_v4(),
        "name": body["name"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "created_by": test_user_id(),
        "created_at": Utc::now(),
        "updated_at": null,
    });

    state.lock().unwrap().projects.push(project.clone());
    Ok((StatusCode::CREATED, Json(project)))
}

async fn update_project(
    State(state): State<Shared>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;

    let mut guard = state.lock().unwrap();
    let project = guard
        .projects
        .iter_mut()
        .find(|p| p["id"] == json!(id))
        .ok_or_else(|| not_found("Project not found"))?;

    for field in ["name", "description"] {
        if let Some(value) = body.get(field) {
            if !value.is_null() {
                project[field] = value.clone();
            }
        }
    }
    project["updated_at"] = json!(Utc::now());
    Ok(Json(project.clone()))
}

async fn list_project_tasks(
    State(state): State<Shared>,
    Path(project_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let guard = state.lock().unwrap();
    let tasks: Vec<Value> = guard
        .tasks
        .iter()
        .filter(|t| t["project_id"] == json!(project_id))
        .cloned()
        .collect();
    Ok(Json(Value::Array(tasks)))
}

async fn list_notifications(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let unread_only = params.get("unread_only").map(String::as_str) == Some("true");

    let guard = state.lock().unwrap();
    let notifications: Vec<Value> = guard
        .notifications
        .iter()
        .filter(|n| !unread_only || n["read"] == json!(false))
        .cloned()
        .collect();
    Ok(Json(Value::Array(notifications)))
}

async fn mark_notification_read(
    State(state): State<Shared>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;

    let mut guard = state.lock().unwrap();
    let notification = guard
        .notifications
        .iter_mut()
        .find(|n| n["id"] == json!(id))
        .ok_or_else(|| not_found("Notification not found"))?;

    notification["read"] = json!(true);
    Ok(Json(notification.clone()))
}
