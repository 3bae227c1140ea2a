use crate::error::AppError;
use bcrypt::{hash, verify};

/// Salted one-way hash with a configurable cost factor (env `BCRYPT_COST`,
/// default 10). Intentionally expensive; callers accept the latency.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Constant-time comparison through bcrypt's own verify. A mismatch and a
/// malformed stored hash both come back as `false`, never as an error.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cost 4 is the bcrypt minimum; keeps the suite fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password, TEST_COST).unwrap();

        assert!(verify_password(password, &hashed));
        assert!(!verify_password("wrong_password", &hashed));
    }

    #[test]
    fn test_verify_with_malformed_hash_is_false_not_error() {
        assert!(!verify_password("test_password123", "invalidhashformat"));
        assert!(!verify_password("test_password123", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same_password", TEST_COST).unwrap();
        let b = hash_password("same_password", TEST_COST).unwrap();
        assert_ne!(a, b);
    }
}
