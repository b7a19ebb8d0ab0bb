//! Accounta is a lightweight email-based account manager.

#[forbid(unsafe_code)]
#[deny(missing_docs, unused_mut)]
mod auth;
mod crypto;
mod database;
pub mod error;
mod router;
pub mod telemetry;
mod user;

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, header};
use axum::routing::{get, post};
use axum::{Router, middleware as AxumMiddleware};
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub db: database::Database,
    pub crypto: Arc<crypto::PasswordManager>,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION, header::COOKIE]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
                .allow_headers(Any)
                .vary([header::AUTHORIZATION]),
        );

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        // `POST /create` goes to `create`.
        .route("/create", post(router::create::handler))
        // `POST /login` goes to `login`.
        .route("/login", post(router::login::handler))
        // administrative listing/editing surface.
        .nest("/admin", router::admin::router())
        .with_state(state)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>>
{
    // read configuration file. let it in memory.
    let config = config::Configuration::default().read()?;

    let db = match config.postgres {
        Some(ref config) => {
            database::Database::new(
                &config.address,
                &config
                    .username
                    .clone()
                    .unwrap_or(database::DEFAULT_CREDENTIALS.into()),
                &config
                    .password
                    .clone()
                    .unwrap_or(database::DEFAULT_CREDENTIALS.into()),
                &config
                    .database
                    .clone()
                    .unwrap_or(database::DEFAULT_DATABASE_NAME.into()),
                config.pool_size.unwrap_or(database::DEFAULT_POOL_SIZE),
            )
            .await?
        },
        None => {
            tracing::error!("missing `postgres` entry on `config.yaml` file");
            std::process::exit(0);
        },
    };

    // execute migrations scripts on start.
    sqlx::migrate!().run(&db.postgres).await?;

    let crypto =
        Arc::new(crypto::PasswordManager::new(config.argon2.clone())?);

    Ok(AppState { config, db, crypto })
}
