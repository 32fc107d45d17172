use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, info_span, warn, Instrument};
use voxpath_core::{GridData, PathRequest, Position, RequestId, Response, SearchOptions};

use crate::errors::AppError;
use crate::pool::WorkerPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<WorkerPool>,
}

/// `findPath` fields; `id` is optional over HTTP.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindPathBody {
    pub id: Option<RequestId>,
    pub start: Position,
    pub goal: Position,
    #[serde(default)]
    pub grid_data: Option<GridData>,
    #[serde(default)]
    pub options: SearchOptions,
}

#[derive(Debug, Serialize)]
pub struct Healthz {
    pub status: &'static str,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/version", get(version))
        .route("/find_path", post(find_path))
        .route("/cache/clear", post(clear_cache))
        .route("/stats", get(stats))
        .route("/grid", post(update_grid))
        .with_state(state)
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(v)| v).map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected message");
        AppError::BadRequest(rejection.body_text())
    })
}

/// Protocol-level errors are answered with 422 and the `error` message body.
fn protocol_response(resp: Response) -> HttpResponse {
    let status = match resp {
        Response::Error { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    (status, Json(resp)).into_response()
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(Healthz { status: "ok" }))
}

async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.pool.is_ready() {
        (StatusCode::OK, Json(json!({"ready": true, "workers": state.pool.len()})))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"ready": false, "workers": state.pool.len()})))
    }
}

async fn version() -> impl IntoResponse {
    let svc_version = env!("CARGO_PKG_VERSION");
    let core_version = voxpath_core::version();
    (StatusCode::OK, Json(json!({"service_version": svc_version, "core_version": core_version})))
}

async fn find_path(
    State(state): State<AppState>,
    payload: Result<Json<FindPathBody>, JsonRejection>,
) -> Result<HttpResponse, AppError> {
    let body = decode(payload)?;
    let internal_id = state.pool.next_request_id();
    let caller_id = body.id.unwrap_or(internal_id);
    let span = info_span!("find_path", id = caller_id);

    async move {
        let req = PathRequest {
            id: internal_id,
            start: body.start,
            goal: body.goal,
            grid_data: body.grid_data,
            options: body.options,
        };
        let mut resp = state.pool.find_path(req).await?;
        resp.set_request_id(caller_id);
        if let Response::PathResult(r) = &resp {
            let path_len = r.path.as_ref().map(Vec::len).unwrap_or(0);
            info!(
                cached = r.cached,
                complete = r.complete,
                partial = r.partial,
                iterations = r.stats.iterations,
                time_ms = r.stats.time_ms,
                path_len,
                "find_path done"
            );
        }
        Ok::<_, AppError>(protocol_response(resp))
    }
    .instrument(span)
    .await
}

async fn clear_cache(State(state): State<AppState>) -> Result<HttpResponse, AppError> {
    let resp = state.pool.clear_cache().await?;
    Ok(protocol_response(resp))
}

async fn stats(State(state): State<AppState>) -> Result<HttpResponse, AppError> {
    let stats = state.pool.stats().await?;
    Ok(protocol_response(Response::Stats(stats)))
}

async fn update_grid(
    State(state): State<AppState>,
    payload: Result<Json<GridData>, JsonRejection>,
) -> Result<HttpResponse, AppError> {
    let grid = decode(payload)?;
    let cells = grid.occupied_cells.len();
    let resp = state.pool.update_grid(grid).await?;
    info!(cells, accepted = matches!(resp, Response::GridUpdated), "grid pushed");
    Ok(protocol_response(resp))
}
