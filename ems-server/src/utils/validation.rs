//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: department, job role, leave type, holiday, task title, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons (leave reason, remarks, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, work id, leave type codes, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a minimally well-formed email (non-empty, contains '@', within limit)
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    if !value.contains('@') {
        return Err(AppError::validation(format!("Invalid email: {value}")));
    }
    Ok(())
}

/// Validate a money amount: finite and non-negative
pub fn validate_money(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be a non-negative amount"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank_and_overlong() {
        assert!(validate_required_text("ok", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn money_rejects_negative_and_nan() {
        assert!(validate_money(0.0, "basic_salary").is_ok());
        assert!(validate_money(1234.56, "basic_salary").is_ok());
        assert!(validate_money(-1.0, "basic_salary").is_err());
        assert!(validate_money(f64::NAN, "basic_salary").is_err());
        assert!(validate_money(f64::INFINITY, "basic_salary").is_err());
    }

    #[test]
    fn email_needs_at_sign() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }
}
