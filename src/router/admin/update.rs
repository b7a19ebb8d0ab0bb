//! Detail and edit screens over one account.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Result, ServerError};
use crate::router::Valid;
use crate::user::{AccountChanges, User, UserRepository, UserService};
use crate::AppState;

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
    pub public_name: Option<String>,
    #[validate(email(message = "Email must be formatted."))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_foodtruck: Option<bool>,
    /// When present the credential is rehashed as a second write.
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    pub password: Option<String>,
}

impl From<Body> for AccountChanges {
    fn from(body: Body) -> Self {
        Self {
            public_name: body.public_name,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            is_active: body.is_active,
            is_staff: body.is_staff,
            is_superuser: body.is_superuser,
            is_foodtruck: body.is_foodtruck,
            password: body.password,
        }
    }
}

async fn find(state: &AppState, user_id: i64) -> Result<User> {
    UserRepository::new(state.db.postgres.clone())
        .find_by_id(user_id)
        .await?
        .ok_or(ServerError::NotFound)
}

/// Detail screen.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>> {
    let user = find(&state, user_id).await?;
    Ok(Json(user))
}

/// Edit screen: partial field changes, optional password rehash.
pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Valid(body): Valid<Body>,
) -> Result<Json<User>> {
    let user = find(&state, user_id).await?;

    let user = UserService::new(
        user,
        state.db.postgres.clone(),
        Arc::clone(&state.crypto),
    )
    .update(body.into())
    .await?;

    Ok(Json(user.data))
}
