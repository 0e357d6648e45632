use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, SalonConfig, ServerConfig};
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::{appointments::AppointmentStore, runtime};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_from_env();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Load the salon configuration and the appointment store, then build the router.
///
/// A missing or invalid salon configuration aborts startup.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let storage = &cfg.storage;
    runtime::ensure_env(&storage.frontend_dir, &storage.data_file)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let salon = SalonConfig::load(&storage.salon_config)
        .map_err(|e| StartupError::InvalidConfig(format!("{e:#}")))?;
    info!(stylists = ?salon.stylists(), default_stylist = %salon.default_stylist(), "salon configuration loaded");

    let store = AppointmentStore::new(&storage.data_file, salon.clone())
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    info!(data_file = %storage.data_file, "appointment store ready");

    let state = ServerState { appointments: store, salon: Arc::new(salon) };
    Ok(routes::build_router(state, build_cors(), &storage.frontend_dir))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = AppConfig::load_or_env()?;
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting booking server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_salon_config_aborts_startup() {
        let mut cfg = AppConfig::default();
        let dir = std::env::temp_dir().join(format!("startup_{}", uuid::Uuid::new_v4()));
        cfg.storage.data_file = dir.join("citas.json").to_string_lossy().into_owned();
        cfg.storage.salon_config = dir.join("config.json").to_string_lossy().into_owned();

        let err = build_app(&cfg).await.err().expect("startup must fail");
        assert!(matches!(err, StartupError::InvalidConfig(_)));
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[test]
    fn bind_addr_from_server_config() -> anyhow::Result<()> {
        let addr = bind_addr(&ServerConfig { host: "0.0.0.0".into(), port: 8000, worker_threads: None })?;
        assert_eq!(addr.port(), 8000);
        Ok(())
    }
}
