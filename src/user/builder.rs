//! Typed builder for User.

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::crypto::PasswordManager;
use crate::user::{Credential, User, UserService};

/// [`User`] builder.
///
/// `public_name` and `email` are tracked at the type level: creation
/// needs both, a lookup by natural key only needs `email`.
#[derive(Debug, Clone)]
pub struct UserBuilder<Name, Email> {
    public_name: Name,
    email: Email,
    password: String,
    first_name: String,
    last_name: String,
    foodtruck: bool,
}

/// Value is missing on [`UserBuilder`].
#[derive(Debug, Clone)]
pub struct Missing;

/// Value is present on [`UserBuilder`].
#[derive(Debug, Clone)]
pub struct Present<T>(pub T);

impl UserBuilder<Missing, Missing> {
    /// Create a new [`UserBuilder`].
    pub fn new() -> Self {
        Self {
            public_name: Missing,
            email: Missing,
            password: String::default(),
            first_name: String::default(),
            last_name: String::default(),
            foodtruck: false,
        }
    }
}

impl Default for UserBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Email> UserBuilder<Missing, Email> {
    /// Update `public_name` field on [`UserBuilder`].
    pub fn public_name(
        self,
        public_name: impl Into<String>,
    ) -> UserBuilder<Present<String>, Email> {
        UserBuilder {
            public_name: Present(public_name.into()),
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            foodtruck: self.foodtruck,
        }
    }
}

impl<Name> UserBuilder<Name, Missing> {
    /// Update `email` field on [`UserBuilder`].
    pub fn email(
        self,
        email: impl Into<String>,
    ) -> UserBuilder<Name, Present<String>> {
        UserBuilder {
            public_name: self.public_name,
            email: Present(email.into()),
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            foodtruck: self.foodtruck,
        }
    }
}

impl<Name, Email> UserBuilder<Name, Email> {
    /// Update `password` field on [`UserBuilder`].
    pub fn password(mut self, password: impl ToString) -> Self {
        self.password = password.to_string();
        self
    }

    /// Update `first_name` field on [`UserBuilder`].
    pub fn first_name(mut self, first_name: Option<String>) -> Self {
        self.first_name = first_name.unwrap_or_default();
        self
    }

    /// Update `last_name` field on [`UserBuilder`].
    pub fn last_name(mut self, last_name: Option<String>) -> Self {
        self.last_name = last_name.unwrap_or_default();
        self
    }

    /// Mark the account as a foodtruck one.
    pub fn foodtruck(mut self, foodtruck: bool) -> Self {
        self.foodtruck = foodtruck;
        self
    }
}

impl UserBuilder<Missing, Present<String>> {
    /// Build a [`User`] with `email` only, for natural-key lookups and
    /// superuser creation.
    pub fn build(
        self,
        pool: Pool<Postgres>,
        crypto: Arc<PasswordManager>,
    ) -> UserService {
        let user = User {
            email: self.email.0,
            password: Credential::new(self.password),
            first_name: self.first_name,
            last_name: self.last_name,
            ..Default::default()
        };

        UserService::new(user, pool, crypto)
    }
}

impl UserBuilder<Present<String>, Present<String>> {
    /// Build a [`User`] with `public_name` and `email`.
    pub fn build(
        self,
        pool: Pool<Postgres>,
        crypto: Arc<PasswordManager>,
    ) -> UserService {
        let mut user = User {
            public_name: self.public_name.0,
            email: self.email.0,
            password: Credential::new(self.password),
            first_name: self.first_name,
            last_name: self.last_name,
            ..Default::default()
        };
        user.permissions.is_foodtruck = self.foodtruck;

        UserService::new(user, pool, crypto)
    }
}
