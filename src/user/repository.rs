//! Handle database requests.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use validator::{ValidationError, ValidationErrors};

use crate::error::{Result, ServerError};
use crate::user::User;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const PUBLIC_NAME_CONSTRAINT: &str = "users_public_name_key";

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

/// Turn a duplicate-key write failure into a field-level validation
/// error; anything else stays an SQL error.
fn map_write_error(err: sqlx::Error) -> ServerError {
    let field = match err.as_database_error() {
        Some(db) if db.is_unique_violation() => match db.constraint() {
            Some(EMAIL_CONSTRAINT) => "email",
            Some(PUBLIC_NAME_CONSTRAINT) => "publicName",
            _ => return ServerError::Sql(err),
        },
        _ => return ServerError::Sql(err),
    };

    let mut errors = ValidationErrors::new();
    errors.add(
        field,
        ValidationError::new("unique")
            .with_message(format!("This {field} is already in use.").into()),
    );
    errors.into()
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert [`User`] into database.
    ///
    /// `id`, `date_joined` and `last_login` are assigned by PostgreSQL
    /// and read back from the inserted row.
    pub async fn insert(&self, user: &User) -> Result<User> {
        let created = sqlx::query_as::<_, User>(
            r#"INSERT INTO users
                (public_name, email, first_name, last_name, password, is_foodtruck)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *"#,
        )
        .bind(&user.public_name)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.password.as_str())
        .bind(user.permissions.is_foodtruck)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(created)
    }

    /// Find user using the `id` surrogate key.
    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    /// Find user using the `email` natural key. Exact match.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List users ordered by `id`, optionally filtered by a search term
    /// over email, public name, first and last name.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<User>> {
        let users = match search {
            Some(term) => {
                let pattern = format!("%{term}%");
                sqlx::query_as::<_, User>(
                    r#"SELECT * FROM users
                        WHERE email ILIKE $1
                            OR public_name ILIKE $1
                            OR first_name ILIKE $1
                            OR last_name ILIKE $1
                        ORDER BY id"#,
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            },
            None => {
                sqlx::query_as::<_, User>(
                    r#"SELECT * FROM users ORDER BY id"#,
                )
                .fetch_all(&self.pool)
                .await?
            },
        };

        Ok(users)
    }

    /// Update every non-credential field of current user.
    pub async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"UPDATE users
                SET public_name = $1, email = $2, first_name = $3,
                    last_name = $4, is_active = $5, is_staff = $6,
                    is_superuser = $7, is_foodtruck = $8
                WHERE id = $9"#,
        )
        .bind(&user.public_name)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.permissions.is_active)
        .bind(user.permissions.is_staff)
        .bind(user.permissions.is_superuser)
        .bind(user.permissions.is_foodtruck)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    /// Replace stored credential material.
    pub async fn update_password(&self, user_id: i64, phc: &str) -> Result<()> {
        sqlx::query(r#"UPDATE users SET password = $1 WHERE id = $2"#)
            .bind(phc)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Refresh `last_login` timestamp.
    pub async fn update_last_login(
        &self,
        user_id: i64,
        at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(r#"UPDATE users SET last_login = $1 WHERE id = $2"#)
            .bind(at)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Grant or revoke role flags. Ordered after the base-entity write
    /// within superuser creation.
    pub async fn set_role_flags(
        &self,
        user_id: i64,
        staff: bool,
        superuser: bool,
    ) -> Result<()> {
        sqlx::query(
            r#"UPDATE users SET is_staff = $1, is_superuser = $2 WHERE id = $3"#,
        )
        .bind(staff)
        .bind(superuser)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
