pub mod extractors;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserView;

// Re-export the pieces handlers and main wire together.
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use policy::can_act_on_task;
pub use token::{issue_token, verify_token, Claims, TokenKeys};

/// Payload for a new account registration.
///
/// Fields default to empty strings so a missing field surfaces as a
/// "required" violation in the aggregated error list, alongside whatever
/// else is wrong with the request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom = "crate::security::validate_register_email")]
    pub email: String,

    #[serde(default)]
    #[validate(custom = "crate::security::validate_password")]
    pub password: String,

    #[serde(default)]
    #[validate(custom = "crate::security::validate_display_name")]
    pub name: String,
}

/// Payload for a login request. Presence checks only; the email format is
/// deliberately not validated here so responses cannot reveal which
/// registered addresses are well-formed.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom = "crate::security::validate_login_email")]
    pub email: String,

    #[serde(default)]
    #[validate(custom = "crate::security::validate_login_password")]
    pub password: String,
}

/// Response after successful registration or login: the session token plus
/// the public user projection.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accumulates_all_violations() {
        let empty: RegisterRequest = serde_json::from_str("{}").unwrap();
        let errors = empty.validate().unwrap_err();
        // email, password, and name all report at once.
        assert_eq!(errors.field_errors().len(), 3);

        let valid = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            name: "Test User".to_string(),
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_register_request_email_format() {
        let bad_email = RegisterRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
            name: "Test User".to_string(),
        };
        let errors = bad_email.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_login_request_tolerates_malformed_email() {
        let login = LoginRequest {
            email: "not-an-email".to_string(),
            password: "whatever".to_string(),
        };
        assert!(login.validate().is_ok());

        let blank: LoginRequest = serde_json::from_str("{}").unwrap();
        let errors = blank.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }
}
