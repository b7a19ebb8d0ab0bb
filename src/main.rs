use axum::routing::get;

use accounta::{app, initialize_state, telemetry};

const DEFAULT_PORT: u16 = 1111;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let state = initialize_state().await?;
    let recorder = telemetry::setup_metrics_recorder()?;

    let app = app(state).route(
        "/metrics",
        get(move || std::future::ready(recorder.render())),
    );

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let listener =
        tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;

    tracing::info!(%port, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot install shutdown handler");
    }
}
