use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::worker::WorkerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<WorkerError> for AppError {
    fn from(e: WorkerError) -> Self {
        match e {
            WorkerError::DuplicateId(_) => AppError::Conflict(e.to_string()),
            other => AppError::Internal(other.into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorPayload<'a>,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    code: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "duplicate_id", msg),
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", e.to_string()),
        };
        (status, Json(ErrorBody { error: ErrorPayload { code, message } })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn render(err: fn() -> AppError) -> (StatusCode, Value) {
        let app = Router::new().route("/", get(move || async move { Err::<(), AppError>(err()) }));
        let res = app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn disconnected_worker_is_internal_error() {
        let (status, v) = render(|| WorkerError::Disconnected.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(v["error"]["code"], "internal");
        assert_eq!(v["error"]["message"], "pathfinding worker is not running");
    }

    #[tokio::test]
    async fn duplicate_id_is_conflict() {
        let (status, v) = render(|| WorkerError::DuplicateId(4).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(v["error"]["code"], "duplicate_id");
        assert_eq!(v["error"]["message"], "request id 4 is already in flight");
    }

    #[tokio::test]
    async fn bad_request_keeps_message() {
        let (status, v) = render(|| AppError::BadRequest("missing goal".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["error"], serde_json::json!({"code": "bad_request", "message": "missing goal"}));
    }
}
