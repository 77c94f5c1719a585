use bcrypt::{hash, verify};
use thiserror::Error;

/// bcrypt only looks at the first 72 bytes of its input
const MAX_PASSWORD_BYTES: usize = 72;

pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password cannot be empty")]
    Empty,
    #[error("Password must be no more than 72 bytes long")]
    TooLong,
    #[error("Failed to hash password")]
    HashingFailed,
    #[error("Failed to verify password")]
    VerificationFailed,
}

/// Reject passwords bcrypt cannot represent faithfully
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }

    Ok(())
}

/// Hash a password using bcrypt with the given work factor
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    validate_password(password)?;

    hash(password, cost).map_err(|_| PasswordError::HashingFailed)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    verify(password, hash).map_err(|_| PasswordError::VerificationFailed)
}
