//! Creation screen: add an account with password confirmation.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::user::{User, UserBuilder};

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(
        length(min = 1, max = 30),
        custom(
            function = "crate::router::validate_public_name",
            message = "Name must not contain whitespaces."
        )
    )]
    pub public_name: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    pub password: String,
    #[validate(must_match(
        other = "password",
        message = "Passwords do not match."
    ))]
    pub password_confirmation: String,
    pub is_foodtruck: Option<bool>,
}

pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<User>)> {
    let user = UserBuilder::new()
        .public_name(&body.public_name)
        .email(&body.email)
        .password(&body.password)
        .foodtruck(body.is_foodtruck.unwrap_or_default())
        .build(state.db.postgres.clone(), Arc::clone(&state.crypto))
        .create_user()
        .await?;

    tracing::info!(user_id = user.data.id, "account created by admin");

    Ok((StatusCode::CREATED, Json(user.data)))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    use crate::*;

    #[sqlx::test]
    async fn test_admin_create_user(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/admin/users",
            json!({
                "publicName": "truck1",
                "email": "truck@example.com",
                "password": "testpass123",
                "passwordConfirmation": "testpass123",
                "isFoodtruck": true,
            })
            .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[sqlx::test]
    async fn test_admin_create_mismatched_confirmation(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/admin/users",
            json!({
                "publicName": "truck2",
                "email": "truck2@example.com",
                "password": "testpass123",
                "passwordConfirmation": "testpass124",
            })
            .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
