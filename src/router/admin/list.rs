//! Listing screen: all accounts ordered by id.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::user::{User, UserRepository};

#[derive(Debug, Deserialize)]
pub struct Params {
    /// Term matched against email, public name, first and last name.
    search: Option<String>,
}

/// One listing row, projected on [`super::LIST_COLUMNS`] plus the id.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: i64,
    pub email: String,
    pub public_name: String,
    pub first_name: String,
    pub last_name: String,
    pub is_foodtruck: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl From<User> for Row {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            public_name: user.public_name,
            first_name: user.first_name,
            last_name: user.last_name,
            is_foodtruck: user.permissions.is_foodtruck,
            date_joined: user.date_joined,
            last_login: user.last_login,
        }
    }
}

pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<Row>>> {
    let users = UserRepository::new(state.db.postgres.clone())
        .list(params.search.as_deref())
        .await?;

    Ok(Json(users.into_iter().map(Row::from).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use super::Row;
    use crate::*;

    async fn rows(
        response: axum::http::Response<axum::body::Body>,
    ) -> Vec<Row> {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_list_users(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::GET,
            "/admin/users",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let rows = rows(response).await;
        assert_eq!(rows.len(), 2);
        // Ordered by surrogate key.
        assert!(rows[0].id < rows[1].id);
        assert_eq!(rows[0].public_name, "amelia");
        assert!(rows[1].is_foodtruck);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_list_users_with_search(pool: Pool<Postgres>) {
        let app = app(router::state(pool));

        let response = make_request(
            app.clone(),
            Method::GET,
            "/admin/users?search=vega",
            String::default(),
        )
        .await;
        let rows_found = rows(response).await;
        assert_eq!(rows_found.len(), 1);
        assert_eq!(rows_found[0].last_name, "Vega");

        let response = make_request(
            app,
            Method::GET,
            "/admin/users?search=nobody",
            String::default(),
        )
        .await;
        assert!(rows(response).await.is_empty());
    }
}
