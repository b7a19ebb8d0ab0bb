mod builder;
mod repository;
mod service;

pub use builder::*;
pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};

/// User as saved on database.
///
/// Authentication is keyed on `email`; `public_name` is the unique
/// display handle.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub public_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip)]
    #[sqlx(try_from = "String")]
    pub password: Credential,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub permissions: Permissions,
    pub date_joined: chrono::DateTime<chrono::Utc>,
    pub last_login: chrono::DateTime<chrono::Utc>,
}

/// Role and eligibility flags of a [`User`].
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow,
)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    /// Gates authentication eligibility.
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_foodtruck: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
            is_foodtruck: false,
        }
    }
}

/// Opaque credential material. Holds a PHC string once hashed and is
/// never serialized out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Create a new [`Credential`] from raw material.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Stored form, as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }
}

impl TryFrom<String> for Credential {
    type Error = std::convert::Infallible;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(value))
    }
}

/// Canonical form of an email address: domain part lowercased, local
/// part untouched.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => {
            format!("{local}@{}", domain.to_lowercase())
        },
        None => email.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("test@GMAIL.COM"), "test@gmail.com");
        assert_eq!(normalize_email("Ada@Example.Org"), "Ada@example.org");
        assert_eq!(normalize_email("already@lower.net"), "already@lower.net");
        // No domain part, nothing to normalize.
        assert_eq!(normalize_email("not-an-email"), "not-an-email");
    }

    #[test]
    fn test_password_is_never_serialized() {
        let user = User {
            public_name: "name1".into(),
            email: "a@b.com".into(),
            password: Credential::new("$argon2id$secret"),
            ..Default::default()
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secret"));
        assert!(json.contains("\"isActive\":true"));
    }
}
