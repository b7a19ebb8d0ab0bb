use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use validator::{ValidationError, ValidationErrors};

use crate::crypto::PasswordManager;
use crate::error::Result;
use crate::user::{Credential, User, UserRepository, normalize_email};

/// Placeholder handle given to accounts created through
/// [`UserService::create_superuser`].
pub const SUPERUSER_NAME: &str = "superuser";

/// Partial field changes applied through [`UserService::update`].
/// Omitted fields leave existing values untouched.
#[derive(Debug, Default, Clone)]
pub struct AccountChanges {
    pub public_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_foodtruck: Option<bool>,
    /// Triggers a rehash-and-persist as a second write.
    pub password: Option<String>,
}

/// User manager.
#[derive(Clone)]
pub struct UserService {
    pub repo: UserRepository,
    pub crypto: Arc<PasswordManager>,
    pub data: User,
}

fn missing_field(field: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(field).with_message(message.into())
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(
        user: User,
        pool: Pool<Postgres>,
        crypto: Arc<PasswordManager>,
    ) -> Self {
        Self {
            data: user,
            repo: UserRepository::new(pool),
            crypto,
        }
    }

    /// Create builded user.
    ///
    /// Lowercase public name, normalize email and hash password before
    /// the single insert.
    pub async fn create_user(mut self) -> Result<Self> {
        let mut errors = ValidationErrors::new();
        if self.data.email.trim().is_empty() {
            errors.add(
                "email",
                missing_field("email", "Users must have an email address."),
            );
        }
        if self.data.public_name.trim().is_empty() {
            errors.add(
                "publicName",
                missing_field("public_name", "Users must have a public name."),
            );
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        self.data.public_name = self.data.public_name.to_lowercase();
        self.data.email = normalize_email(&self.data.email);
        self.data.password =
            Credential::new(self.crypto.hash_password(self.data.password.as_str())?);

        self.data = self.repo.insert(&self.data).await?;
        Ok(self)
    }

    /// Create a superuser from `email` and `password`.
    ///
    /// Delegates to [`Self::create_user`] under the `superuser` handle,
    /// then grants staff and superuser flags as a second write.
    pub async fn create_superuser(mut self) -> Result<Self> {
        self.data.public_name = SUPERUSER_NAME.to_owned();

        let mut user = self.create_user().await?;
        user.repo.set_role_flags(user.data.id, true, true).await?;
        user.data.permissions.is_staff = true;
        user.data.permissions.is_superuser = true;

        Ok(user)
    }

    /// Find current user using the `email` natural key.
    pub async fn find_by_email(mut self) -> Result<Option<Self>> {
        let email = normalize_email(&self.data.email);
        match self.repo.find_by_email(&email).await? {
            Some(user) => {
                self.data = user;
                Ok(Some(self))
            },
            None => Ok(None),
        }
    }

    /// Apply partial field changes to current user.
    ///
    /// Non-password fields go out as one write; a new password is
    /// rehashed and persisted separately afterwards. The plaintext is
    /// never stored nor logged.
    pub async fn update(mut self, changes: AccountChanges) -> Result<Self> {
        if let Some(public_name) = changes.public_name {
            self.data.public_name = public_name;
        }
        if let Some(email) = changes.email {
            self.data.email = email;
        }
        if let Some(first_name) = changes.first_name {
            self.data.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.data.last_name = last_name;
        }
        if let Some(is_active) = changes.is_active {
            self.data.permissions.is_active = is_active;
        }
        if let Some(is_staff) = changes.is_staff {
            self.data.permissions.is_staff = is_staff;
        }
        if let Some(is_superuser) = changes.is_superuser {
            self.data.permissions.is_superuser = is_superuser;
        }
        if let Some(is_foodtruck) = changes.is_foodtruck {
            self.data.permissions.is_foodtruck = is_foodtruck;
        }

        self.repo.update(&self.data).await?;

        if let Some(password) = changes.password {
            let phc = self.crypto.hash_password(&password)?;
            self.repo.update_password(self.data.id, &phc).await?;
            self.data.password = Credential::new(phc);
        }

        Ok(self)
    }

    /// Persist a new last-login moment on `user`.
    ///
    /// Both the user and the moment must be present, otherwise this is
    /// a no-op reported as `false`.
    pub async fn update_login(
        user: Option<&mut UserService>,
        moment: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        match user.zip(moment) {
            Some((user, at)) => {
                user.repo.update_last_login(user.data.id, at).await?;
                user.data.last_login = at;
                Ok(true)
            },
            None => Ok(false),
        }
    }
}
