mod dispatch;
mod domain;
mod error;
mod infra;
mod middleware;
mod routes;
mod security;
mod session;
mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use infra::xano::XanoCtx;
use security::config::SecurityConfig;
use security::jwt::JwtManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let xano = XanoCtx::from_env()?;
    let jwt = JwtManager::default();
    let security = SecurityConfig::default();
    let shared_state = state::AppState::new(xano, jwt, security);

    let app = Router::new()
        .merge(routes::router(shared_state.clone()))
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
