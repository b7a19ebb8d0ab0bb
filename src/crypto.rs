//! Credential hashing.

use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Argon2, Params, Version};
use rand::rngs::OsRng;
use validator::{ValidationError, ValidationErrors};

use crate::config::Argon2 as ArgonConfig;

type Result<T> = std::result::Result<T, CryptoError>;

#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    #[error("argon2 error: {0}")]
    Argon2(String),
}

/// Password manager that uses Argon2id and PHC string format for hashing and
/// verification.
pub struct PasswordManager {
    params: Params,
}

impl PasswordManager {
    /// Create a new [`PasswordManager`].
    pub fn new(config: Option<ArgonConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let params = Params::new(
            config.memory_cost,
            config.iterations,
            config.parallelism,
            Some(config.hash_length),
        )
        .map_err(|err| CryptoError::Argon2(err.to_string()))?;

        Ok(Self { params })
    }

    /// Hash password using Argon2id.
    pub fn hash_password(&self, password: impl AsRef<[u8]>) -> Result<String> {
        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            Version::V0x13,
            self.params.clone(),
        );
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(password.as_ref(), &salt)
            .map_err(|e| CryptoError::Argon2(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn invalid_password() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.add(
            "password",
            ValidationError::new("invalid_password")
                .with_message("Invalid password.".into()),
        );
        errors
    }

    /// Verify password against a PHC.
    pub fn verify_password(
        &self,
        password: impl AsRef<[u8]>,
        phc_hash: &str,
    ) -> std::result::Result<(), ValidationErrors> {
        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            Version::V0x13,
            self.params.clone(),
        );

        let parsed =
            PasswordHash::new(phc_hash).map_err(|_| Self::invalid_password())?;

        argon2
            .verify_password(password.as_ref(), &parsed)
            .map_err(|_| Self::invalid_password())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let pwd = PasswordManager::new(None).unwrap();

        let phc = pwd.hash_password("testpass123").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(pwd.verify_password("testpass123", &phc).is_ok());
        assert!(pwd.verify_password("testpass124", &phc).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let pwd = PasswordManager::new(None).unwrap();

        let first = pwd.hash_password("testpass123").unwrap();
        let second = pwd.hash_password("testpass123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_garbage_phc() {
        let pwd = PasswordManager::new(None).unwrap();
        assert!(pwd.verify_password("testpass123", "not-a-phc").is_err());
    }
}
