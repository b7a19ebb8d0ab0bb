//! Credential verification and last-login refresh.

use std::sync::Arc;

use sqlx::PgPool;

use crate::crypto::PasswordManager;
use crate::error::{Result, ServerError};
use crate::user::{User, UserBuilder, UserService};

/// Explicit authentication service: pool and hasher are injected, no
/// ambient state.
#[derive(Clone)]
pub struct Authenticator {
    pool: PgPool,
    crypto: Arc<PasswordManager>,
}

impl Authenticator {
    /// Create a new [`Authenticator`].
    pub fn new(pool: PgPool, crypto: Arc<PasswordManager>) -> Self {
        Self { pool, crypto }
    }

    /// Verify `email` + `password` against the stored credential.
    ///
    /// Unknown email, inactive account and wrong password all surface
    /// as the same [`ServerError::Unauthorized`]; nothing is mutated on
    /// any failure path. On success `last_login` is refreshed, falling
    /// back to the matched entity unchanged if that write fails.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let found = UserBuilder::new()
            .email(email)
            .build(self.pool.clone(), Arc::clone(&self.crypto))
            .find_by_email()
            .await?;

        let Some(mut user) = found else {
            return Err(ServerError::Unauthorized);
        };

        if !user.data.permissions.is_active {
            return Err(ServerError::Unauthorized);
        }

        if self
            .crypto
            .verify_password(password, user.data.password.as_str())
            .is_err()
        {
            return Err(ServerError::Unauthorized);
        }

        let now = chrono::Utc::now();
        if let Err(err) =
            UserService::update_login(Some(&mut user), Some(now)).await
        {
            tracing::warn!(
                user_id = user.data.id,
                error = %err,
                "last-login refresh failed, keeping matched account"
            );
        }

        Ok(user.data)
    }
}
