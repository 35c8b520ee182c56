//! Password hashing with Argon2
//!
//! Hashes imported from the legacy system are bcrypt (`$2a$`/`$2b$`/`$2y$`);
//! those still verify, new hashes are always Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use zxcvbn::{zxcvbn, Score};

use crm_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

#[derive(Error, Debug, PartialEq)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Verification failed")]
    VerificationFailed,
    #[error("Password too short")]
    TooShort,
    #[error("Password too long")]
    TooLong,
    #[error("Password too weak")]
    TooWeak,
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        if Self::is_bcrypt(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::HashError(e.to_string()));
        }

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Length bounds plus a zxcvbn score of at least 2.
    pub fn check_strength(password: &str, user_inputs: &[&str]) -> Result<(), PasswordError> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong);
        }
        if zxcvbn(password, user_inputs).score() < Score::Two {
            return Err(PasswordError::TooWeak);
        }
        Ok(())
    }

    fn is_bcrypt(hash: &str) -> bool {
        hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("correct horse battery").unwrap();
        assert!(PasswordService::verify("correct horse battery", &hash).unwrap());
        assert!(!PasswordService::verify("wrong horse battery", &hash).unwrap());
    }

    #[test]
    fn test_verify_legacy_bcrypt() {
        let hash = bcrypt::hash("legacy-secret-42", 4).unwrap();
        assert!(PasswordService::verify("legacy-secret-42", &hash).unwrap());
        assert!(!PasswordService::verify("legacy-secret-43", &hash).unwrap());
    }

    #[test]
    fn test_strength() {
        assert_eq!(PasswordService::check_strength("short", &[]), Err(PasswordError::TooShort));
        assert_eq!(PasswordService::check_strength("password", &[]), Err(PasswordError::TooWeak));
        assert!(PasswordService::check_strength("Imobiliaria#Centro2024", &[]).is_ok());
    }
}
