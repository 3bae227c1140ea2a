//!
//! # Persistence Gateway
//!
//! The rest of the application talks to storage exclusively through the
//! [`Store`] trait: opaque insert/find/update/delete operations over two
//! record kinds (users and tasks), keyed by gateway-generated identifiers.
//! The gateway is constructed once in `main` and injected into handlers via
//! `web::Data`; there is no lazily-initialized global handle.
//!
//! Two implementations exist: [`postgres::PgStore`] for production and
//! [`memory::MemoryStore`] for tests and local development. Both enforce
//! case-insensitive email uniqueness and refresh `updated_at` on every task
//! update, including a no-op status patch.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskStatus, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug)]
pub enum StoreError {
    /// The email is already taken (unique-index violation).
    DuplicateEmail,
    /// Any other backend failure. Surfaces to the caller as a 500.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::DuplicateEmail => write!(f, "email already registered"),
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match &error {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::DuplicateEmail
            }
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail => AppError::Conflict("Email already registered".into()),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// CRUD operations over the two record kinds. Identifiers and timestamps
/// are generated here, not by callers.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Lookup is case-insensitive; stored emails are normalized lowercase.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError>;

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// All tasks owned by the user, newest first.
    async fn tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError>;

    /// Applies a status change and refreshes `updated_at`. A `None` status
    /// is a timestamp-only touch. Returns `None` when the task no longer
    /// exists.
    async fn update_task_status(
        &self,
        id: Uuid,
        status: Option<TaskStatus>,
    ) -> Result<Option<Task>, StoreError>;

    /// Returns `true` if a record was deleted.
    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;
}
