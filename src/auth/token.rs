use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Role;

/// Claims encoded in a session token. The token is the sole authentication
/// proof; nothing is persisted server-side and there is no revocation list.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The authenticated user's identifier.
    pub sub: Uuid,
    /// The role captured at issuance. A role change takes effect once the
    /// old token expires.
    pub role: Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Process-wide signing material, built once at startup from `JWT_SECRET`.
/// A missing secret aborts startup (`Config::from_env`), so issuance and
/// verification can never silently run unkeyed.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_days: i64,
}

impl TokenKeys {
    pub fn new(secret: &str, expiry_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_days,
        }
    }
}

/// Issues a signed token embedding the user's identity and role.
pub fn issue_token(keys: &TokenKeys, user_id: Uuid, role: Role) -> Result<String, AppError> {
    let now = Utc::now();
    let expiry = now + chrono::Duration::days(keys.expiry_days);

    let claims = Claims {
        sub: user_id,
        role,
        iat: now.timestamp(),
        exp: expiry.timestamp(),
    };

    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies signature and expiry and decodes the claims. Malformed, forged,
/// and expired tokens all produce the same non-specific 401.
pub fn verify_token(keys: &TokenKeys, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> TokenKeys {
        TokenKeys::new("test-secret", 7)
    }

    #[test]
    fn test_token_round_trip() {
        let keys = test_keys();
        let user_id = Uuid::new_v4();

        let token = issue_token(&keys, user_id, Role::Admin).unwrap();
        let claims = verify_token(&keys, &token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected_nonspecifically() {
        let keys = test_keys();
        let past = Utc::now() - chrono::Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::User,
            iat: past.timestamp() - 60,
            exp: past.timestamp(),
        };
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret".as_bytes()),
        )
        .unwrap();

        match verify_token(&keys, &expired) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid or expired token"),
            other => panic!("expected Unauthorized, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_foreign_signature_is_rejected_nonspecifically() {
        let keys = test_keys();
        let foreign = issue_token(
            &TokenKeys::new("a-completely-different-secret", 7),
            Uuid::new_v4(),
            Role::User,
        )
        .unwrap();

        match verify_token(&keys, &foreign) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid or expired token"),
            other => panic!("expected Unauthorized, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_garbage_token_is_rejected_nonspecifically() {
        match verify_token(&test_keys(), "not.a.token") {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid or expired token"),
            other => panic!("expected Unauthorized, got {:?}", other.map(|c| c.sub)),
        }
    }
}
