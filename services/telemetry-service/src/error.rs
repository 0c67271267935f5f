use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use vanitygen_common::EnvError;

use crate::validation::Field;

/// Every way a request can fail. The `Display` text is the plain-text body
/// sent to the client.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Not found")]
    NotFound,
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("Invalid {0}")]
    InvalidField(Field),
    #[error("Internal server error")]
    Storage(#[source] StoreError),
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Rejection::NotFound => StatusCode::NOT_FOUND,
            Rejection::InvalidJson | Rejection::InvalidField(_) => StatusCode::BAD_REQUEST,
            Rejection::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match &self {
            Rejection::Storage(err) => {
                tracing::error!(error = %err, "telemetry insert failed");
            }
            other => {
                tracing::debug!(status = other.status().as_u16(), reason = %other, "rejected");
            }
        }
        (self.status(), self.to_string()).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection is closed")]
    Closed,
    #[error("insert telemetry failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("DATABASE_URL is not a valid connection string: {0}")]
    DatabaseUrl(#[source] tokio_postgres::Error),
}

/// Fatal startup and serve failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("connect db: {0}")]
    Connect(#[source] tokio_postgres::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
