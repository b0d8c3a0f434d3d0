use rdkafka::error::KafkaError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid sleep bounds: min {min}s is greater than max {max}s")]
    SleepBounds { min: u64, max: u64 },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to serialize event: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to parse event document: {0}")]
    Parse(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("event offset {0} is the last representable offset")]
    OffsetExhausted(i64),

    #[error("failed to create Kafka producer: {0}")]
    Client(#[source] KafkaError),

    #[error("failed to send event to topic '{topic}': {source}")]
    Send { topic: String, source: KafkaError },

    #[error("failed to write event to console: {0}")]
    Console(#[from] io::Error),
}

/// Everything an entry point can fail with before exiting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
