//! Public configuration page for front-end identification and customization.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::config::Configuration;

/// Structured configuration.
#[derive(Serialize)]
pub struct Status {
    version: String,
    name: String,
    favicon: Option<String>,
}

/// Public server status (configuration).
pub async fn status(
    State(config): State<Arc<Configuration>>,
) -> Json<Status> {
    Json(Status {
        version: env!("CARGO_PKG_VERSION").into(),
        name: if config.name.is_empty() {
            env!("CARGO_CRATE_NAME").into()
        } else {
            config.name.clone()
        },
        favicon: config.favicon.clone(),
    })
}
