//! Request-shape validation, run before any service call.
//!
//! Each check is a pure function returning `Some(FieldError)` on failure. An input type
//! lists its checks in order and the pipeline collects every failure.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{ApiError, FieldError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Implemented by every request body the API accepts
pub trait Validate {
    fn checks(&self) -> Vec<Option<FieldError>>;

    fn validate(&self) -> Result<(), ApiError> {
        run(self.checks())
    }
}

/// Collect failures from an ordered list of checks
pub fn run(checks: impl IntoIterator<Item = Option<FieldError>>) -> Result<(), ApiError> {
    let errors: Vec<FieldError> = checks.into_iter().flatten().collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_failed(errors))
    }
}

/// Present and not just whitespace
pub fn required(field: &str, value: Option<&str>, message: &str) -> Option<FieldError> {
    match value {
        Some(v) if !v.trim().is_empty() => None,
        _ => Some(FieldError::new(field, message)),
    }
}

/// When present, must not be blank
pub fn not_blank(field: &str, value: Option<&str>, message: &str) -> Option<FieldError> {
    match value {
        Some(v) if v.trim().is_empty() => Some(FieldError::new(field, message)),
        _ => None,
    }
}

/// Present and shaped like an address
pub fn email(field: &str, value: Option<&str>) -> Option<FieldError> {
    let valid = value
        .map(str::trim)
        .and_then(|v| v.split_once('@'))
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    (!valid).then(|| FieldError::new(field, "Please include a valid email"))
}

/// Present with at least `min` characters
pub fn min_length(
    field: &str,
    value: Option<&str>,
    min: usize,
    message: &str,
) -> Option<FieldError> {
    match value {
        Some(v) if v.chars().count() >= min => None,
        _ => Some(FieldError::new(field, message)),
    }
}

/// When present, must be a `YYYY-MM-DD` date
pub fn date(field: &str, value: Option<&str>) -> Option<FieldError> {
    let v = value?.trim();
    if v.is_empty() || NaiveDate::parse_from_str(v, DATE_FORMAT).is_ok() {
        None
    } else {
        Some(FieldError::new(field, format!("{} must be a date (YYYY-MM-DD)", field)))
    }
}

/// Parse an optional date that already passed [`date`]
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
}

/// Path identifiers are UUIDs; anything else is rejected before touching storage
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_field(field, "Invalid ID"))
}
