//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way
//! to represent the error taxonomy the API contract promises: validation
//! failures aggregate field messages under `{"errors": [...]}`, everything
//! else renders as `{"error": "..."}`, and 500-class failures are logged
//! server-side with the client-facing message genericized.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert
//! application errors into HTTP responses with JSON bodies. `From` impls for
//! `sqlx::Error`, `validator::ValidationErrors`, `jsonwebtoken::errors::Error`,
//! and `bcrypt::BcryptError` allow conversion with the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// Aggregated field-level validation failures (HTTP 400).
    Validation(Vec<String>),
    /// Authentication failure: token missing, invalid, or expired, or bad
    /// credentials (HTTP 401). Messages stay non-specific.
    Unauthorized(String),
    /// Authorization denial: the caller is neither owner nor admin (HTTP 403).
    Forbidden(String),
    /// Requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Duplicate email at registration (HTTP 409).
    Conflict(String),
    /// Rate limit exceeded on an authentication endpoint (HTTP 429).
    TooManyRequests(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure in the persistence gateway (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Validation(msgs) => write!(f, "Validation Failed: {}", msgs.join(", ")),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::TooManyRequests(msg) => write!(f, "Too Many Requests: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msgs) => HttpResponse::BadRequest().json(json!({
                "errors": msgs
            })),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                // Real cause stays server-side.
                log::error!("{}", self);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
            other => HttpResponse::build(other.status_code()).json(json!({
                "error": match other {
                    AppError::BadRequest(msg)
                    | AppError::Unauthorized(msg)
                    | AppError::Forbidden(msg)
                    | AppError::NotFound(msg)
                    | AppError::Conflict(msg)
                    | AppError::TooManyRequests(msg) => msg.as_str(),
                    _ => "Internal server error",
                }
            })),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Flattens `validator::ValidationErrors` into the aggregated message list
/// the API returns. Every violated field contributes its message; none are
/// dropped.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let messages = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}

/// Token processing failures collapse to one non-specific message so callers
/// cannot distinguish a bad signature from an expired token.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized("Invalid or expired token".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}
