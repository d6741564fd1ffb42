//! Merchant credential hashing.
//!
//! Stored credentials are Argon2id PHC strings, which carry their own salt
//! and cost parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{ServiceError, ServiceResult};

/// Argon2id PHC string for `password` under a fresh salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(password: &str) -> ServiceResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::PasswordHash(e.to_string()))?
        .map_err(|e| ServiceError::PasswordHash(e.to_string()))
}

/// Check a merchant login against its stored credential.
///
/// A wrong password is `Ok(false)`. A stored value that is not a PHC string
/// is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let stored = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_is_argon2id_and_verifies() {
        let stored = hash_password("s3cret-pass").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("s3cret-pass", &stored).unwrap());
        assert!(!verify_password("other", &stored).unwrap());
    }

    #[test]
    fn each_hash_gets_its_own_salt() {
        assert_ne!(hash_password("repeat").unwrap(), hash_password("repeat").unwrap());
    }

    #[test]
    fn non_phc_stored_value_is_an_error() {
        assert!(verify_password("x", "plaintext").is_err());
    }

    #[tokio::test]
    async fn blocking_pool_hash_verifies() {
        let stored = hash_password_blocking("pw").await.unwrap();
        assert!(verify_password("pw", &stored).unwrap());
    }
}
