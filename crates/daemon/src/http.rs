//! HTTP surface: JSON routes over the task service.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rota_core::api::{CompleteRequest, CompleteResponse, TodayTask};
use rota_core::model::{CompletionRecord, Task};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::{ServiceError, TaskService};

#[derive(Clone)]
pub struct AppState {
    svc: Arc<TaskService>,
}

pub fn router(svc: Arc<TaskService>) -> Router {
    let state = AppState { svc };
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/tasks", get(list_tasks))
        .route("/v1/tasks/today", get(today))
        .route("/v1/tasks/today/shuffle", post(shuffle))
        .route("/v1/tasks/complete", post(complete))
        .route("/v1/tasks/completed", get(completion_history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_tasks(State(st): State<AppState>) -> Json<Vec<Task>> {
    Json(st.svc.catalog())
}

async fn today(State(st): State<AppState>) -> Result<Json<Vec<TodayTask>>, ServiceError> {
    Ok(Json(st.svc.today().await?))
}

async fn shuffle(State(st): State<AppState>) -> Result<Json<Vec<TodayTask>>, ServiceError> {
    Ok(Json(st.svc.reshuffle().await?))
}

async fn complete(
    State(st): State<AppState>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>, ServiceError> {
    st.svc.set_completion(&req.task_id, req.completed).await?;
    Ok(Json(CompleteResponse {
        ok: true,
        message: None,
    }))
}

async fn completion_history(State(st): State<AppState>) -> Json<Vec<CompletionRecord>> {
    Json(st.svc.completion_history())
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));
        (status, body).into_response()
    }
}
