//! REST queue CRUD: create, list, and delete queues for a tenant, plus a
//! liveness probe.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use broker_core::service::QueueService;
use broker_core::{Error as CoreError, QueueName, TenantId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, instrument};

#[derive(Clone)]
pub struct AdminState {
    pub service: Arc<QueueService>,
}

pub fn create_router(state: AdminState) -> Router {
    let queue_routes = Router::new()
        .route("/api/v1/vmq", post(create_queue))
        .route("/api/v1/vmq", get(list_queues))
        .route("/api/v1/vmq/:queue_name", delete(delete_queue));

    let health_routes = Router::new().route("/healthz", get(healthz));

    Router::new()
        .merge(queue_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TenantQuery {
    uid: String,
}

#[derive(Debug, Deserialize)]
struct CreateQueueQuery {
    uid: String,
    qn: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListQueuesResponse {
    queues: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn core_error_response(err: CoreError) -> Response {
    let status = match err {
        CoreError::AlreadyExists(_) => StatusCode::CONFLICT,
        CoreError::QueueNotFound(_) | CoreError::QueueGone(_) => StatusCode::NOT_FOUND,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::MessageNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::QueueEmpty | CoreError::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

#[instrument(skip(state))]
async fn create_queue(
    State(state): State<AdminState>,
    Query(query): Query<CreateQueueQuery>,
) -> Response {
    match state
        .service
        .create_queue(TenantId::new(query.uid), query.qn)
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            error!(error = %err, "create_queue failed");
            core_error_response(err)
        }
    }
}

#[instrument(skip(state))]
async fn list_queues(State(state): State<AdminState>, Query(query): Query<TenantQuery>) -> Response {
    let names = state.service.list_queues(&TenantId::new(query.uid));
    Json(ListQueuesResponse { queues: names }).into_response()
}

#[instrument(skip(state))]
async fn delete_queue(
    State(state): State<AdminState>,
    Path(queue_name): Path<String>,
    Query(query): Query<TenantQuery>,
) -> Response {
    let name = match QueueName::new(queue_name) {
        Ok(name) => name,
        Err(err) => return core_error_response(CoreError::Validation(err)),
    };
    match state
        .service
        .delete_queue(&TenantId::new(query.uid), &name)
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            error!(error = %err, "delete_queue failed");
            core_error_response(err)
        }
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
