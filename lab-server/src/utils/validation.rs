//! Input validation helpers
//!
//! Centralized field constraints for order and user input. Invoked once, at
//! the service boundary; handlers do not re-validate.

use rust_decimal::Decimal;
use shared::{Comment, ServiceItem};

use crate::utils::AppError;

// ── Field length limits ─────────────────────────────────────────────

/// Lab identifier.
pub const MIN_LAB_LEN: usize = 2;

/// Patient and customer names.
pub const MIN_PERSON_NAME_LEN: usize = 3;

/// Upper bound for any free-text field.
pub const MAX_TEXT_LEN: usize = 500;

/// Passwords (before hashing).
pub const MIN_PASSWORD_LEN: usize = 6;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate a required free-text field with a minimum length.
pub fn validate_text(value: &str, field: &str, min_len: usize) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if trimmed.len() < min_len {
        return Err(AppError::validation(format!(
            "{field} must have at least {min_len} characters"
        )));
    }
    if value.len() > MAX_TEXT_LEN {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {MAX_TEXT_LEN})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate a single service line item: non-empty name, positive value.
pub fn validate_service(service: &ServiceItem) -> Result<(), AppError> {
    if service.name.trim().is_empty() {
        return Err(AppError::validation("service name must not be empty"));
    }
    if service.value <= Decimal::ZERO {
        return Err(AppError::validation(
            "service value must be greater than zero",
        ));
    }
    Ok(())
}

/// Validate a non-empty service list and every item in it.
pub fn validate_services(services: &[ServiceItem]) -> Result<(), AppError> {
    if services.is_empty() {
        return Err(AppError::validation(
            "order must have at least one service",
        ));
    }
    for service in services {
        validate_service(service)?;
    }
    Ok(())
}

/// Validate a comment: non-empty content.
pub fn validate_comment(comment: &Comment) -> Result<(), AppError> {
    if comment.content.trim().is_empty() {
        return Err(AppError::validation("comment content must not be empty"));
    }
    if comment.content.len() > MAX_TEXT_LEN {
        return Err(AppError::validation(format!(
            "comment is too long ({} chars, max {MAX_TEXT_LEN})",
            comment.content.len()
        )));
    }
    Ok(())
}
