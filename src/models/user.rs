use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role. Corresponds to the `user_role` SQL enum.
///
/// There is no endpoint that sets this; admins are provisioned directly in
/// the store. Default is `User`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// A user record as held by the persistence gateway.
///
/// Deliberately does not implement `Serialize`: the password hash must never
/// reach a response body. API responses go through [`UserView`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields the gateway needs to mint a new user record. The gateway supplies
/// the identifier and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn new(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: input.email,
            name: input.name,
            password_hash: input.password_hash,
            role: input.role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The public projection of a user. `created_at` is only present on the
/// current-user endpoint, matching the wire format clients already consume.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserView {
    /// Projection returned from register/login.
    pub fn brief(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            created_at: None,
        }
    }

    /// Projection returned from the current-user endpoint.
    pub fn profile(user: &User) -> Self {
        Self {
            created_at: Some(user.created_at),
            ..Self::brief(user)
        }
    }
}
