use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use log::error;
use serde_json::json;
use shared::{CreateTaskRequest, LoginRequest, Task, UpdateTaskRequest, User};
use tasksync::{AppContext, SyncError};
use tokio::task::{spawn_blocking, JoinError};
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

pub type AppState = Arc<AppContext>;

pub fn router(context: AppState) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/session", get(current_session))
        .route("/api/tasks", get(get_tasks).post(create_task))
        .route("/api/tasks/reload", post(reload_tasks))
        .route("/api/tasks/fetch", post(fetch_remote_tasks))
        .route("/api/tasks/events", get(task_events))
        .route("/api/tasks/:id", put(update_task).delete(delete_task))
        .route("/api/tasks/:id/toggle", post(toggle_task))
        .route("/api/validate", get(validate))
        .route("/api/info", get(info))
        .layer(CorsLayer::permissive())
        .with_state(context)
}

pub enum ApiError {
    Sync(SyncError),
    Worker(JoinError),
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        ApiError::Sync(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Worker(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Sync(err) => {
                let status = match &err {
                    SyncError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
                    SyncError::TaskNotFound(_) => StatusCode::NOT_FOUND,
                    SyncError::EmptyTitle => StatusCode::BAD_REQUEST,
                    SyncError::Network(_) => StatusCode::BAD_GATEWAY,
                    SyncError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            ApiError::Worker(err) => {
                error!("Blocking task failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// Synchronous service calls write through to storage, so they run on the
// blocking pool instead of an async worker.
async fn blocking<T, F>(context: AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AppContext) -> Result<T, SyncError> + Send + 'static,
{
    Ok(spawn_blocking(move || op(&context)).await??)
}

async fn login(
    State(context): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = context
        .session()
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(user))
}

async fn logout(State(context): State<AppState>) -> Result<StatusCode, ApiError> {
    blocking(context, |context| {
        context.session().logout();
        Ok(())
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn current_session(State(context): State<AppState>) -> Json<Option<User>> {
    Json(context.session().current_user())
}

async fn get_tasks(State(context): State<AppState>) -> Json<Vec<Task>> {
    Json(context.tasks().current_tasks())
}

async fn create_task(
    State(context): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = context
        .tasks()
        .add_task(&payload.title, &payload.description)
        .await?;
    Ok(Json(task))
}

async fn reload_tasks(State(context): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = blocking(context, |context| context.tasks().load_tasks()).await?;
    Ok(Json(tasks))
}

async fn fetch_remote_tasks(
    State(context): State<AppState>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(context.tasks().fetch_tasks_from_remote().await?))
}

async fn update_task(
    Path(id): Path<Uuid>,
    State(context): State<AppState>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = blocking(context, move |context| context.tasks().patch_task(id, &payload)).await?;
    Ok(Json(task))
}

async fn toggle_task(
    Path(id): Path<Uuid>,
    State(context): State<AppState>,
) -> Result<Json<Task>, ApiError> {
    let task = blocking(context, move |context| context.tasks().toggle_task_completion(id)).await?;
    Ok(Json(task))
}

async fn delete_task(
    Path(id): Path<Uuid>,
    State(context): State<AppState>,
) -> Result<StatusCode, ApiError> {
    blocking(context, move |context| context.tasks().delete_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Emits the current list right away, then again after every change.
async fn task_events(
    State(context): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = WatchStream::new(context.tasks().subscribe())
        .map(|tasks| Event::default().event("tasks").json_data(&tasks));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct ValidateParams {
    username: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct ValidationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<bool>,
}

async fn validate(
    State(context): State<AppState>,
    Query(params): Query<ValidateParams>,
) -> Json<ValidationResult> {
    Json(ValidationResult {
        username: params.username.map(|u| context.is_valid_username(&u)),
        email: params.email.map(|e| context.is_valid_email(&e)),
    })
}

async fn info(State(context): State<AppState>) -> String {
    context.info()
}
