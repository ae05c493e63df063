//! Password value object.
//!
//! Wraps an Argon2 PHC hash string. Plain text only ever passes through
//! [`Password::new`] and [`Password::verify`]; nothing else in the crate
//! sees it, and it is never persisted.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::domain::FieldErrors;
use crate::errors::{AppError, AppResult};

/// Salted password hash.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password with a fresh random salt.
    ///
    /// # Errors
    /// Returns a `password` field error if the input is shorter than
    /// the minimum length.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::Validation(FieldErrors::single(
                "password",
                format!(
                    "Password must be at least {} characters long",
                    MIN_PASSWORD_LENGTH
                ),
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap a hash loaded from the database.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A malformed stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match Self::verify_hash(plain_text, &self.hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Stored password hash is unreadable: {}", e);
                false
            }
        }
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::new("dashie20").unwrap();

        assert!(password.verify("dashie20"));
        assert!(!password.verify("wrongpass"));
    }

    #[test]
    fn test_hash_is_not_plain_text() {
        let password = Password::new("twily123").unwrap();

        assert_ne!(password.as_str(), "twily123");
        assert!(password.as_str().starts_with("$argon2"));
    }

    #[test]
    fn test_password_from_hash() {
        let hash = Password::new("lunamoon").unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify("lunamoon"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let pass1 = Password::new("lunamoon").unwrap();
        let pass2 = Password::new("lunamoon").unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify("lunamoon"));
        assert!(pass2.verify("lunamoon"));
    }

    #[test]
    fn test_password_too_short() {
        let result = Password::new("ab");
        match result {
            Err(AppError::Validation(errors)) => {
                assert_eq!(
                    errors.for_field("password"),
                    vec!["Password must be at least 5 characters long"]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(Password::new("12345").is_ok());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let stored = Password::from_hash("plaintext-from-an-old-row".to_string());
        assert!(!stored.verify("plaintext-from-an-old-row"));
    }
}
