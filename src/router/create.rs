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
    /// Write-only: hashed at creation, never echoed back.
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    pub password: String,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
}

/// Handler to create user.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<User>)> {
    let user = UserBuilder::new()
        .public_name(&body.public_name)
        .email(&body.email)
        .password(&body.password)
        .first_name(body.first_name)
        .last_name(body.last_name)
        .build(state.db.postgres.clone(), Arc::clone(&state.crypto))
        .create_user()
        .await?;

    tracing::info!(user_id = user.data.id, "account created");

    Ok((StatusCode::CREATED, Json(user.data)))
}

#[cfg(test)]
pub(super) mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use sqlx::{Pool, Postgres};

    use crate::*;

    #[sqlx::test]
    async fn test_create_handler(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/create",
            json!({
                "publicName": "Name1",
                "email": "test@GMAIL.COM",
                "password": "testpass123",
                "firstName": "Ada",
            })
            .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["publicName"], "name1");
        assert_eq!(body["email"], "test@gmail.com");
        assert_eq!(body["firstName"], "Ada");
        assert_eq!(body["lastName"], "");
        assert_eq!(body["isActive"], true);
        assert_eq!(body["isStaff"], false);
        // Credential material never leaves the server.
        assert!(body.get("password").is_none());
    }

    #[sqlx::test]
    async fn test_create_with_short_password(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/create",
            json!({
                "publicName": "name2",
                "email": "test2@gmail.com",
                "password": "short",
            })
            .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    async fn test_create_rejects_whitespace_name(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/create",
            json!({
                "publicName": "foo bar",
                "email": "test3@gmail.com",
                "password": "testpass123",
            })
            .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    async fn test_create_duplicate_public_name(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let body = json!({
            "publicName": "taken",
            "email": "first@gmail.com",
            "password": "testpass123",
        });
        let response =
            make_request(app.clone(), Method::POST, "/create", body.to_string())
                .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        // Same handle, other email: loses on the uniqueness constraint.
        let body = json!({
            "publicName": "Taken",
            "email": "second@gmail.com",
            "password": "testpass123",
        });
        let response =
            make_request(app, Method::POST, "/create", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body =
            response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["errors"][0]["field"], "publicName");
    }
}
