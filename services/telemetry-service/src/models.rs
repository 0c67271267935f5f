use rust_decimal::Decimal;
use serde::Serialize;

/// One validated run report. Only ever built by `validation::validate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySubmission {
    pub prefix_length: i32,
    pub duration_seconds: f64,
    pub cores_used: i32,
    /// Integral and at least one, otherwise unbounded.
    pub attempts: Decimal,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
}
