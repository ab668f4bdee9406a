mod handlers;
mod state;

use axum::Router;
use axum::routing::get;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::DeliveryConfig;
use crate::location::LocationCheck;

pub fn build_router(config: DeliveryConfig) -> Router {
    let state = Arc::new(AppState {
        check: LocationCheck::from_config(config),
    });

    Router::new()
        .route("/api/check", get(handlers::check))
        .route("/api/config", get(handlers::config))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, config: DeliveryConfig) -> std::io::Result<()> {
    let app = build_router(config);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "delivery range server listening");
    eprintln!("  Delivery range server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
