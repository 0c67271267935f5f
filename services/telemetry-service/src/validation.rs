use std::fmt;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::models::TelemetrySubmission;

pub const MAX_PREFIX_LENGTH: i64 = 52;
/// One year.
pub const MAX_DURATION_SECONDS: f64 = 31_536_000.0;
pub const MAX_CORES_USED: i64 = 1024;

/// Payload fields in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PrefixLength,
    DurationSeconds,
    CoresUsed,
    Attempts,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PrefixLength => "prefix_length",
            Field::DurationSeconds => "duration_seconds",
            Field::CoresUsed => "cores_used",
            Field::Attempts => "attempts",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the top-level JSON object, or `None` for anything else
/// (syntax errors, empty body, arrays, scalars, `null`). Number literals keep
/// their original spelling, so `1e400` parses and fails field validation
/// instead of failing here.
pub fn parse_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Some(fields),
        _ => None,
    }
}

/// Checks the four known fields, stopping at the first violation.
/// Unknown keys are ignored.
pub fn validate(fields: &Map<String, Value>) -> Result<TelemetrySubmission, Field> {
    let prefix_length = fields
        .get(Field::PrefixLength.as_str())
        .and_then(|value| integer_in(value, 1, MAX_PREFIX_LENGTH))
        .ok_or(Field::PrefixLength)?;

    let duration_seconds = fields
        .get(Field::DurationSeconds.as_str())
        .and_then(Value::as_f64)
        .filter(|seconds| (0.0..=MAX_DURATION_SECONDS).contains(seconds))
        .ok_or(Field::DurationSeconds)?;

    let cores_used = fields
        .get(Field::CoresUsed.as_str())
        .and_then(|value| integer_in(value, 1, MAX_CORES_USED))
        .ok_or(Field::CoresUsed)?;

    let attempts = fields
        .get(Field::Attempts.as_str())
        .and_then(as_whole_decimal)
        .filter(|attempts| *attempts >= Decimal::ONE)
        .ok_or(Field::Attempts)?;

    // Both bounds checked above fit in i32.
    Ok(TelemetrySubmission {
        prefix_length: prefix_length as i32,
        duration_seconds,
        cores_used: cores_used as i32,
        attempts,
    })
}

fn integer_in(value: &Value, min: i64, max: i64) -> Option<i64> {
    as_integer(value).filter(|int| (min..=max).contains(int))
}

/// Integral JSON numbers, including float spellings such as `4.0` or `1e3`.
/// Anything outside i64 is out of range for the bounded fields anyway.
fn as_integer(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    let float = number.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}

/// Exact integral value of a JSON number literal, whatever its spelling
/// (`18446744073709551615`, `1e20`, `100.0`). Fails only for fractions and
/// for magnitudes past the 96-bit decimal mantissa.
fn as_whole_decimal(value: &Value) -> Option<Decimal> {
    let Value::Number(number) = value else {
        return None;
    };
    let literal = number.to_string().to_ascii_lowercase();
    let decimal = if literal.contains('e') {
        Decimal::from_scientific(&literal).ok()?
    } else {
        Decimal::from_str_exact(&literal).ok()?
    };
    decimal.fract().is_zero().then(|| decimal.normalize())
}
