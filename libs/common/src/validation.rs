//! Field rules shared by the request payloads
//!
//! Each function has the signature `validator` expects for
//! `#[validate(custom(function = "..."))]`.

use regex::Regex;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::sync::OnceLock;
use validator::ValidationError;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(invalid("required", "Username is required"));
    }

    if username.len() < 3 {
        return Err(invalid(
            "too_short",
            "Username must be at least 3 characters long",
        ));
    }

    if username.len() > 32 {
        return Err(invalid(
            "too_long",
            "Username must be at most 32 characters long",
        ));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_.]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(invalid(
            "format",
            "Username can only contain letters, numbers, dots and underscores",
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(invalid("required", "Email is required"));
    }

    if email.len() > 254 {
        return Err(invalid("too_long", "Email must be at most 254 characters long"));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(invalid("format", "Invalid email format"));
    }

    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(invalid(
            "too_short",
            "Password must be at least 8 characters long",
        ));
    }

    if password.len() > 128 {
        return Err(invalid(
            "too_long",
            "Password must be at most 128 characters long",
        ));
    }

    Ok(())
}

/// Reject strings that are empty once trimmed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "Must not be blank"));
    }
    Ok(())
}

/// Prices and budgets cannot be negative
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid("negative", "Must not be negative"));
    }
    Ok(())
}
