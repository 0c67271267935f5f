//! SQL for the `telemetry` table. The table is provisioned outside this
//! service:
//!
//! ```sql
//! CREATE TABLE telemetry (
//!     id BIGSERIAL PRIMARY KEY,
//!     prefix_length INTEGER NOT NULL,
//!     duration_seconds DOUBLE PRECISION NOT NULL,
//!     cores_used INTEGER NOT NULL,
//!     attempts NUMERIC NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use tokio_postgres::{Error, GenericClient};

use crate::models::TelemetrySubmission;

const SQL_INSERT_TELEMETRY: &str = "INSERT INTO telemetry \
(prefix_length, duration_seconds, cores_used, attempts) \
VALUES ($1, $2, $3, $4)";

pub async fn insert_telemetry(
    db: &impl GenericClient,
    submission: &TelemetrySubmission,
) -> Result<u64, Error> {
    db.execute(
        SQL_INSERT_TELEMETRY,
        &[
            &submission.prefix_length,
            &submission.duration_seconds,
            &submission.cores_used,
            &submission.attempts,
        ],
    )
    .await
}
