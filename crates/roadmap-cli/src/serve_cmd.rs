use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use roadmap_core::plan::{PlanDocument, WeekView};
use roadmap_core::{Roadmap, ServiceError};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    /// Translate a service failure. `internal_message` replaces the error text
    /// for storage failures, which are logged but never sent to the client.
    pub fn service(err: ServiceError, internal_message: &'static str) -> Self {
        let (status, message) = match err {
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServiceError::Upstream(e) => {
                tracing::warn!("{internal_message}: {e:#}");
                (StatusCode::BAD_GATEWAY, "Failed to get feedback".to_owned())
            }
            ServiceError::Internal(e) => {
                tracing::error!("{internal_message}: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    internal_message.to_owned(),
                )
            }
        };
        Self { status, message }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({ "detail": self.message });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult = Result<axum::response::Response, AppError>;

fn message(text: &str) -> axum::response::Response {
    Json(json!({ "message": text })).into_response()
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    pub plan_id: String,
    pub task_id: String,
    pub task_content: String,
}

/// Body shared by `/submit_comment` and `/get_feedback`.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub plan_id: String,
    pub task_id: String,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub plan_id: String,
    pub task_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct EditTaskRequest {
    pub plan_id: String,
    #[serde(default)]
    pub status: String,
    pub task_id: String,
    pub updated_task_content: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(roadmap: Roadmap) -> Router {
    Router::new()
        .route("/add_plan", post(add_plan))
        .route("/get_plan/{plan_id}", get(get_plan))
        .route("/delete_plan/{plan_id}", delete(delete_plan))
        .route("/get_plans", get(list_plans))
        .route("/api/weeks/{week_number}", get(week_across_plans))
        .route("/add_task", post(add_task))
        .route("/delete_task/{plan_id}/{task_id}", delete(delete_task))
        .route("/edit_task", post(edit_task))
        .route("/update_task_status", put(update_task_status))
        .route("/submit_comment", post(submit_comment))
        .route("/get_feedback", post(get_feedback))
        .route(
            "/get_operation_history/{plan_id}",
            get(operation_history),
        )
        .layer(CorsLayer::permissive())
        .with_state(roadmap)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(roadmap: Roadmap, bind: &str, port: u16) -> Result<()> {
    let app = build_router(roadmap);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("roadmap serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("roadmap serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Plan handlers
// ---------------------------------------------------------------------------

async fn add_plan(
    State(svc): State<Roadmap>,
    payload: Result<Json<PlanDocument>, JsonRejection>,
) -> ApiResult {
    let Json(plan) = payload?;
    svc.add_plan(&plan)
        .await
        .map_err(|e| AppError::service(e, "Failed to add teaching plan"))?;
    Ok(message("New teaching plan added successfully"))
}

async fn get_plan(
    State(svc): State<Roadmap>,
    plan_id: Result<Path<String>, PathRejection>,
) -> ApiResult {
    let Path(plan_id) = plan_id?;
    let plan = svc
        .get_plan(&plan_id)
        .await
        .map_err(|e| AppError::service(e, "Failed to get teaching plan"))?;
    Ok(Json(plan).into_response())
}

async fn delete_plan(
    State(svc): State<Roadmap>,
    plan_id: Result<Path<String>, PathRejection>,
) -> ApiResult {
    let Path(plan_id) = plan_id?;
    svc.delete_plan(&plan_id)
        .await
        .map_err(|e| AppError::service(e, "Failed to delete teaching plan"))?;
    Ok(message("Teaching plan deleted successfully"))
}

async fn list_plans(State(svc): State<Roadmap>) -> ApiResult {
    let plans = svc
        .list_plans()
        .await
        .map_err(|e| AppError::service(e, "Failed to list teaching plans"))?;
    Ok(Json(json!({ "plans": plans })).into_response())
}

async fn week_across_plans(
    State(svc): State<Roadmap>,
    week_number: Result<Path<i64>, PathRejection>,
) -> Result<Json<WeekView>, AppError> {
    let Path(week_number) = week_number?;
    let view = svc
        .week_across_plans(week_number)
        .await
        .map_err(|e| AppError::service(e, "Failed to get week"))?;
    Ok(Json(view))
}

async fn operation_history(
    State(svc): State<Roadmap>,
    plan_id: Result<Path<String>, PathRejection>,
) -> ApiResult {
    let Path(plan_id) = plan_id?;
    let records = svc
        .operation_history(&plan_id)
        .await
        .map_err(|e| AppError::service(e, "Failed to get operation history"))?;
    Ok(Json(json!({ "operation_history": records })).into_response())
}

// ---------------------------------------------------------------------------
// Task handlers
// ---------------------------------------------------------------------------

async fn add_task(
    State(svc): State<Roadmap>,
    payload: Result<Json<AddTaskRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    svc.add_task(&req.plan_id, &req.task_id, &req.task_content)
        .await
        .map_err(|e| AppError::service(e, "Failed to add task"))?;
    Ok(message("Task added successfully"))
}

async fn delete_task(
    State(svc): State<Roadmap>,
    ids: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult {
    let Path((plan_id, task_id)) = ids?;
    svc.delete_task(&plan_id, &task_id)
        .await
        .map_err(|e| AppError::service(e, "Failed to delete task"))?;
    Ok(message("Task deleted successfully"))
}

async fn edit_task(
    State(svc): State<Roadmap>,
    payload: Result<Json<EditTaskRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    svc.edit_task(
        &req.plan_id,
        &req.task_id,
        &req.updated_task_content,
        &req.status,
    )
    .await
    .map_err(|e| AppError::service(e, "Failed to update task"))?;
    Ok(message("Task updated successfully"))
}

async fn update_task_status(
    State(svc): State<Roadmap>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    svc.update_task_status(&req.plan_id, &req.task_id, &req.status)
        .await
        .map_err(|e| AppError::service(e, "Failed to update task status"))?;
    Ok(message("Task status updated successfully"))
}

async fn submit_comment(
    State(svc): State<Roadmap>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    svc.submit_comment(&req.plan_id, &req.task_id, &req.comment)
        .await
        .map_err(|e| AppError::service(e, "Failed to submit comment"))?;
    Ok(message("Comment submitted successfully"))
}

async fn get_feedback(
    State(svc): State<Roadmap>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let feedback = svc
        .get_feedback(&req.plan_id, &req.task_id, &req.comment)
        .await
        .map_err(|e| AppError::service(e, "Failed to get feedback"))?;
    Ok(Json(json!({ "feedback": feedback })).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
