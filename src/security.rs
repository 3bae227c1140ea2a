//!
//! # Input Validation and Sanitization
//!
//! Pure functions, no side effects. The validators are wired into the
//! request DTOs through `validator`'s `custom` attribute so that every
//! violated field is reported in one response instead of short-circuiting
//! on the first failure. The sanitizers run after validation, immediately
//! before values reach the persistence gateway.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

use crate::models::task::TaskStatus;

lazy_static! {
    // Deliberately loose: one @, no whitespace, a dot somewhere in the
    // domain. Anything stricter rejects real addresses.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

const TITLE_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 5000;
const SANITIZED_MAX_CHARS: usize = 500;

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Registration email: required, then format-checked.
pub fn validate_register_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(field_error("email_required", "Email is required"));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(field_error("email_format", "Invalid email format"));
    }
    Ok(())
}

/// Registration password: required, then minimum length.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(field_error("password_required", "Password is required"));
    }
    if password.chars().count() < 6 {
        return Err(field_error(
            "password_length",
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(field_error("name_required", "Name is required"));
    }
    Ok(())
}

/// Login email: presence only. No format check, so a malformed address and
/// an unregistered one are indistinguishable to the caller.
pub fn validate_login_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(field_error("email_required", "Email is required"));
    }
    Ok(())
}

pub fn validate_login_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(field_error("password_required", "Password is required"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(field_error("title_required", "Title is required"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(field_error(
            "title_length",
            "Title must not exceed 200 characters",
        ));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(field_error("description_required", "Description is required"));
    }
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(field_error(
            "description_length",
            "Description must not exceed 5000 characters",
        ));
    }
    Ok(())
}

/// Status patch value: must name one of the known statuses. Absence is
/// handled upstream (an absent status is a valid no-op update).
pub fn validate_status_value(status: &str) -> Result<(), ValidationError> {
    if status.parse::<TaskStatus>().is_err() {
        return Err(field_error(
            "status_enum",
            "Status must be one of: pending, in-progress, completed",
        ));
    }
    Ok(())
}

/// Normalizes an email for storage and lookup: trim, lowercase, strip angle
/// brackets.
pub fn sanitize_email(email: &str) -> String {
    email.trim().to_lowercase().replace(['<', '>'], "")
}

/// Cleans free text before persistence: trim, strip angle brackets, and cap
/// at 500 characters. Truncation is silent; the length validators above are
/// a separate, independent constraint.
pub fn sanitize_text(input: &str) -> String {
    input
        .trim()
        .replace(['<', '>'], "")
        .chars()
        .take(SANITIZED_MAX_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_email_rules() {
        assert!(validate_register_email("user@example.com").is_ok());
        assert!(validate_register_email("user.name+tag@sub.example.co").is_ok());

        let blank = validate_register_email("   ").unwrap_err();
        assert_eq!(blank.message.unwrap(), "Email is required");

        let no_at = validate_register_email("userexample.com").unwrap_err();
        assert_eq!(no_at.message.unwrap(), "Invalid email format");

        // No dot in the domain part.
        assert!(validate_register_email("user@localhost").is_err());
        assert!(validate_register_email("user name@example.com").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(
            validate_password("").unwrap_err().message.unwrap(),
            "Password is required"
        );
        assert_eq!(
            validate_password("12345").unwrap_err().message.unwrap(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_login_validators_skip_format_checks() {
        // A malformed address passes login validation so the later 401
        // cannot reveal whether it was malformed or simply unregistered.
        assert!(validate_login_email("not-an-email").is_ok());
        assert!(validate_login_email("").is_err());
        assert!(validate_login_password("x").is_ok());
        assert!(validate_login_password(" ").is_err());
    }

    #[test]
    fn test_title_and_description_bounds() {
        assert!(validate_title("Buy milk").is_ok());
        assert!(validate_title("  ").is_err());
        assert!(validate_title(&"a".repeat(200)).is_ok());
        assert_eq!(
            validate_title(&"a".repeat(201)).unwrap_err().message.unwrap(),
            "Title must not exceed 200 characters"
        );

        assert!(validate_description("2 liters").is_ok());
        assert!(validate_description("").is_err());
        assert!(validate_description(&"b".repeat(5000)).is_ok());
        assert!(validate_description(&"b".repeat(5001)).is_err());
    }

    #[test]
    fn test_status_values() {
        assert!(validate_status_value("pending").is_ok());
        assert!(validate_status_value("in-progress").is_ok());
        assert!(validate_status_value("completed").is_ok());
        assert!(validate_status_value("done").is_err());
        assert!(validate_status_value("PENDING").is_err());
    }

    #[test]
    fn test_sanitize_email() {
        assert_eq!(sanitize_email("  User@Example.COM  "), "user@example.com");
        assert_eq!(sanitize_email("<user@example.com>"), "user@example.com");
    }

    #[test]
    fn test_sanitize_text_strips_and_truncates() {
        assert_eq!(
            sanitize_text("<script>alert(1)</script>"),
            "scriptalert(1)/script"
        );
        assert_eq!(sanitize_text("  padded  "), "padded");

        let long = "x".repeat(600);
        assert_eq!(sanitize_text(&long).chars().count(), 500);
    }
}
