pub mod config;
mod kafka_client;
mod publisher_loop;
mod sink;

pub use config::{Configs, KeyStrategy, LoopSettings, Pacing};
pub use kafka_client::KafkaSink;
pub use publisher_loop::{PublisherLoop, RunSummary};
pub use sink::{ConsoleSink, EventSink};

use log::{error, info};
use tokio_util::sync::CancellationToken;

use crate::errors::ConfigError;

pub const CONFIG_ENV: &str = "DEVICE_EVENTS_CONFIG";

/// Reads the file named by `DEVICE_EVENTS_CONFIG`, or falls back to defaults.
pub fn load_configs() -> Result<Configs, ConfigError> {
    let configs = match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let configs = Configs::load_from_file(&path)?;
            info!("Configurations loaded from {}", path.to_string_lossy());
            configs
        }
        None => {
            info!("{} not set, using default configurations", CONFIG_ENV);
            Configs::default()
        }
    };
    Ok(configs)
}

/// Token cancelled on Ctrl-C, so the loop finishes its current iteration and returns.
pub fn shutdown_on_ctrl_c() -> CancellationToken {
    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                trigger.cancel();
            }
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    shutdown
}
