//! FanZone Server
//!
//! Run with: cargo run --bin fanzone
//!
//! # Configuration
//!
//! Read from `FANZONE_CONFIG` when set, otherwise from the default
//! locations (see `Config::load_default`). `FANZONE_*` environment variables
//! override file values; `RUST_LOG` overrides the configured log level.

use fanzone::api::{serve, AppState};
use fanzone::config::{Config, ConfigError, LoggingConfig};
use fanzone::matchday::{Countdown, CountryCatalog};
use fanzone::presenter::CyclePresenter;
use fanzone::roster::{AttendanceStore, MemoryStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, source) = load_config()?;
    init_tracing(&config.logging);

    tracing::info!("Starting FanZone server v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    config.validate()?;

    let cycle = config.presenter.cycle_config()?;
    let kickoff = config.event.kickoff_time()?;

    let qualified = CountryCatalog::load_or(
        config.event.qualified_countries.as_deref(),
        CountryCatalog::bundled_qualified,
    )?;
    let all_countries = CountryCatalog::load_or(
        config.event.all_countries.as_deref(),
        CountryCatalog::bundled_all,
    )?;
    tracing::info!(
        qualified = qualified.len(),
        all = all_countries.len(),
        "Country catalogs loaded"
    );

    let store = Arc::new(MemoryStore::new(config.store.memory_store_config()));

    let state = AppState::new(
        store.clone(),
        qualified,
        all_countries,
        Countdown::new(kickoff),
        config.api.clone(),
    );

    // The presenter renders into the hub, the latest-frame slot and the log
    let presenter = CyclePresenter::new(cycle, Arc::new(state.window_sinks()));
    let state = state.with_presenter(presenter.view());
    let display = presenter.spawn(store.subscribe().await);

    serve(state, &config.api).await?;

    display.abort();
    tracing::info!("FanZone server stopped");

    Ok(())
}

/// Runs before tracing is up, so failures are returned rather than logged
fn load_config() -> Result<(Config, Option<PathBuf>), ConfigError> {
    match std::env::var_os("FANZONE_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            Ok((Config::load_with_env(&path)?, Some(path)))
        }
        None => Config::load_default(),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("fanzone={},tower_http=info", logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
