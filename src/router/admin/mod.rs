//! Administrative listing/editing surface.
//!
//! Presentation glue only: screens are driven by explicit field
//! configuration instead of framework metadata.
mod create;
mod list;
mod update;

use axum::Json;
use axum::routing::get;
use serde::Serialize;

use crate::AppState;

/// How a field may appear on the edit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// One field of the edit screen: wire name, field group and visibility.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub group: &'static str,
    pub visibility: Visibility,
}

const fn field(
    name: &'static str,
    group: &'static str,
    visibility: Visibility,
) -> FieldSpec {
    FieldSpec {
        name,
        group,
        visibility,
    }
}

/// Columns of the listing screen, in display order.
pub const LIST_COLUMNS: [&str; 7] = [
    "email",
    "publicName",
    "firstName",
    "lastName",
    "isFoodtruck",
    "dateJoined",
    "lastLogin",
];

/// Field groups of the edit screen.
pub const EDIT_FIELDS: [FieldSpec; 8] = [
    field("email", "identity", Visibility::ReadWrite),
    field("password", "identity", Visibility::WriteOnly),
    field("publicName", "personal", Visibility::ReadWrite),
    field("isActive", "permissions", Visibility::ReadWrite),
    field("isStaff", "permissions", Visibility::ReadWrite),
    field("isSuperuser", "permissions", Visibility::ReadWrite),
    field("isFoodtruck", "permissions", Visibility::ReadWrite),
    field("lastLogin", "dates", Visibility::ReadOnly),
];

/// Fields of the creation screen.
pub const ADD_FIELDS: [&str; 4] =
    ["publicName", "email", "password", "passwordConfirmation"];

#[derive(Serialize)]
struct Schema {
    list: [&'static str; 7],
    edit: [FieldSpec; 8],
    add: [&'static str; 4],
}

/// Screen layout for the front-end.
async fn schema() -> Json<Schema> {
    Json(Schema {
        list: LIST_COLUMNS,
        edit: EDIT_FIELDS,
        add: ADD_FIELDS,
    })
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        // `GET /admin/users` lists accounts, `POST` adds one.
        .route("/users", get(list::handler).post(create::handler))
        .route("/users/schema", get(schema))
        // `GET /admin/users/:ID` details, `PATCH` edits.
        .route(
            "/users/{user_id}",
            get(update::get_handler).patch(update::handler),
        )
}
