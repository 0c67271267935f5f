use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
        },
        Method, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};

use crate::error::Rejection;
use crate::models::SubmitResponse;
use crate::state::AppState;
use crate::validation;

pub const SUBMIT_PATH: &str = "/submit";
/// Same ceiling axum applies to its own body extractors.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Single entry point for every request. The method is checked before the
/// path, so an unknown method on an unknown path is still a 405.
pub async fn ingest(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, Rejection> {
    let (parts, body) = request.into_parts();

    if parts.method == Method::OPTIONS {
        return Ok(preflight());
    }
    if parts.method != Method::POST {
        return Err(Rejection::MethodNotAllowed);
    }
    if parts.uri.path() != SUBMIT_PATH {
        return Err(Rejection::NotFound);
    }

    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| Rejection::InvalidJson)?;
    let fields = validation::parse_object(&body).ok_or(Rejection::InvalidJson)?;
    let submission = validation::validate(&fields).map_err(Rejection::InvalidField)?;

    state
        .store
        .insert(&submission)
        .await
        .map_err(Rejection::Storage)?;

    tracing::info!(
        prefix_length = submission.prefix_length,
        duration_seconds = submission.duration_seconds,
        cores_used = submission.cores_used,
        attempts = %submission.attempts,
        "telemetry recorded"
    );

    Ok((
        StatusCode::OK,
        [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(SubmitResponse { ok: true }),
    )
        .into_response())
}

fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
        .into_response()
}
