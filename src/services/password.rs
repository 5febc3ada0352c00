//! Password hashing and policy
//!
//! Argon2id hashing plus the strength policy applied to every password
//! accepted over the API.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// A valid argon2id digest for a password no caller knows. Verified against
/// when a login targets a nonexistent account, so the response time does not
/// reveal whether the email is registered.
pub const FILLER_DIGEST: &str =
    "$argon2id$v=19$m=65536,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Why a password fails the strength policy
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be between {MIN_LENGTH} and {MAX_LENGTH} characters")]
    BadLength,

    #[error("Password must not contain whitespace")]
    ContainsWhitespace,

    #[error("Password must only use latin letters, digits, and punctuation")]
    NonLatin,

    #[error("Password must contain a lowercase letter")]
    MissingLowercase,

    #[error("Password must contain an uppercase letter")]
    MissingUppercase,

    #[error("Password must contain a digit")]
    MissingDigit,

    #[error("Password must contain a special character")]
    MissingSpecial,
}

const MIN_LENGTH: usize = 6;
const MAX_LENGTH: usize = 32;

/// Hash a password using Argon2id with a random salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check a candidate password against the strength policy.
///
/// Accepted passwords are 6 to 32 characters of printable ASCII with no
/// whitespace, and contain at least one lowercase letter, one uppercase
/// letter, one digit, and one special character.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordPolicyError> {
    let len = password.chars().count();
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&len) {
        return Err(PasswordPolicyError::BadLength);
    }
    if password.chars().any(|c| c.is_whitespace()) {
        return Err(PasswordPolicyError::ContainsWhitespace);
    }
    if !password.chars().all(|c| c.is_ascii_graphic()) {
        return Err(PasswordPolicyError::NonLatin);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordPolicyError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    if !password.chars().any(|c| c.is_ascii_punctuation()) {
        return Err(PasswordPolicyError::MissingSpecial);
    }
    Ok(())
}
