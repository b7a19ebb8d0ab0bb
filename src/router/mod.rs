//! HTTP routes.
pub mod admin;
pub mod create;
pub mod login;
pub mod status;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::ServerError;

/// JSON extractor that runs `validator` rules before the handler.
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Public names are handles: no whitespace inside the trimmed value.
pub fn validate_public_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().any(char::is_whitespace) {
        return Err(ValidationError::new("public_name"));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn state(pool: sqlx::PgPool) -> crate::AppState {
    use std::sync::Arc;

    crate::AppState {
        config: Arc::new(crate::config::Configuration::default()),
        db: crate::database::Database { postgres: pool },
        crypto: Arc::new(
            crate::crypto::PasswordManager::new(None)
                .expect("default argon2 params"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_public_name() {
        assert!(validate_public_name("foobar").is_ok());
        assert!(validate_public_name("foo bar").is_err());
        assert!(validate_public_name("foo\tbar").is_err());
        // Surrounding whitespace is trimmed before the check.
        assert!(validate_public_name(" foobar ").is_ok());
    }
}
