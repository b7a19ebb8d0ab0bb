use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::auth::Authenticator;
use crate::error::Result;
use crate::router::Valid;
use crate::user::User;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    pub password: String,
}

/// Handler to authenticate user.
///
/// The resolved account is the response payload; token minting happens
/// downstream.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<User>> {
    let authenticator = Authenticator::new(
        state.db.postgres.clone(),
        Arc::clone(&state.crypto),
    );
    let user = authenticator.authenticate(&body.email, &body.password).await?;

    tracing::debug!(user_id = user.id, "account authenticated");

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::{DateTime, Utc};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use sqlx::{Pool, Postgres};

    use crate::*;

    async fn body_json(
        response: axum::http::Response<axum::body::Body>,
    ) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn timestamp(value: &Value) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value.as_str().unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    #[sqlx::test]
    async fn test_login_refreshes_last_login(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app.clone(),
            Method::POST,
            "/create",
            json!({
                "publicName": "name1",
                "email": "a@b.com",
                "password": "testpass123",
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;

        let response = make_request(
            app,
            Method::POST,
            "/login",
            json!({ "email": "a@b.com", "password": "testpass123" })
                .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let logged = body_json(response).await;
        assert_eq!(logged["id"], created["id"]);
        assert!(logged.get("password").is_none());
        assert!(
            timestamp(&logged["lastLogin"])
                > timestamp(&logged["dateJoined"])
        );
    }

    #[sqlx::test]
    async fn test_login_with_wrong_password(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app.clone(),
            Method::POST,
            "/create",
            json!({
                "publicName": "name1",
                "email": "a@b.com",
                "password": "testpass123",
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;

        let response = make_request(
            app.clone(),
            Method::POST,
            "/login",
            json!({ "email": "a@b.com", "password": "wrongpass123" })
                .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // No mutation on the failure path.
        let path = format!("/admin/users/{}", created["id"]);
        let response =
            make_request(app, Method::GET, &path, String::default()).await;
        let stored = body_json(response).await;
        assert_eq!(stored["lastLogin"], created["dateJoined"]);
    }

    #[sqlx::test]
    async fn test_login_unknown_email(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/login",
            json!({ "email": "ghost@b.com", "password": "testpass123" })
                .to_string(),
        )
        .await;

        // Same generic answer as a wrong password.
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(
            body["title"],
            "Unable to authenticate with provided credentials."
        );
    }

    #[sqlx::test]
    async fn test_login_inactive_account(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app.clone(),
            Method::POST,
            "/create",
            json!({
                "publicName": "name1",
                "email": "a@b.com",
                "password": "testpass123",
            })
            .to_string(),
        )
        .await;
        let created = body_json(response).await;

        let path = format!("/admin/users/{}", created["id"]);
        let response = make_request(
            app.clone(),
            Method::PATCH,
            &path,
            json!({ "isActive": false }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = make_request(
            app,
            Method::POST,
            "/login",
            json!({ "email": "a@b.com", "password": "testpass123" })
                .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
