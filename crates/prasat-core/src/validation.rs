//! Input validation helpers.
//!
//! Validation runs at the boundary, before any storage operation is
//! attempted, so a rejected request is never partially applied.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Validate email syntax.
pub fn validate_email(email: &str) -> Result<()> {
    if validator::validate_email(email) {
        Ok(())
    } else {
        Err(Error::Validation(format!("malformed email: {email}")))
    }
}

/// Validate that an embedding vector has exactly the expected dimension.
pub fn validate_vector_dimension(field: &str, vector: &[f32], expected: usize) -> Result<()> {
    if vector.len() == expected {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{field} must have dimension {expected}, got {}",
            vector.len()
        )))
    }
}

/// Validate that a time range is well-formed (`end >= start`).
pub fn validate_time_range(
    field: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<()> {
    if end >= start {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{field}: end ({end}) precedes start ({start})"
        )))
    }
}

/// Validate a latitude in degrees.
pub fn validate_latitude(latitude: f64) -> Result<()> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "latitude out of range [-90, 90]: {latitude}"
        )))
    }
}

/// Validate a longitude in degrees.
pub fn validate_longitude(longitude: f64) -> Result<()> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "longitude out of range [-180, 180]: {longitude}"
        )))
    }
}
