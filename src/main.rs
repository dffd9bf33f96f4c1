use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use beamline531::channel::ChannelError;
use beamline531::channel::http::HttpChannelService;
use beamline531::config::{AppConfig, ConfigError};
use beamline531::control::ControlError;
use beamline531::layout::{LayoutOptions, Page};
use beamline531::registry::{self, DeviceRegistry, RegistryError};
use beamline531::state::AppState;
use beamline531::{routes, services};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        error!(error = %e, "beamline panel failed");
        std::process::exit(1);
    }
}

/// Sequential startup: every Control is connected and the page rendered
/// before the listener opens.
async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    let service = Arc::new(HttpChannelService::new(&config.service)?);
    info!(root = %service.root(), "beamline-control service configured");

    let descriptors = registry::load_descriptors(config.channels_file.as_deref())?;
    let mut devices = DeviceRegistry::from_descriptors(descriptors)?;
    devices.connect_all(service.as_ref()).await?;

    let options = LayoutOptions { refresh_interval_ms: config.refresh_interval_ms, ..LayoutOptions::default() };
    let page = Page::assemble(devices.create_gui()?, &options).render();
    info!(devices = devices.len(), bytes = page.len(), "page assembled");

    let state = AppState::new(devices, service, page, Duration::from_millis(config.refresh_interval_ms));

    let _refresh = services::refresh::spawn_refresh_task(state.clone());

    let app = routes::app(state, &config.assets_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "beamline panel listening");
    axum::serve(listener, app).await?;
    Ok(())
}
