use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::ConfigError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Configs {
    #[serde(default)]
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(skip)]
    config_path: Option<PathBuf>,
}

impl Configs {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut configs: Configs =
            toml::from_str(&config_content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        configs.config_path = Some(path.to_path_buf());
        Ok(configs)
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KafkaConfig {
    #[serde(alias = "bootstrapAddress")]
    pub bootstrap_address: String,
    #[serde(alias = "topicName")]
    pub topic_name: String,
    pub client_id: String,
    pub message_timeout_ms: u64,
    /// How long to wait for queued messages when the producer is released.
    pub flush_timeout_ms: u64,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            bootstrap_address: "localhost:9092".to_string(),
            topic_name: "device-data".to_string(),
            client_id: "device-publisher".to_string(),
            message_timeout_ms: 5000,
            flush_timeout_ms: 5000,
        }
    }
}

impl KafkaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bootstrap_address.trim().is_empty() {
            return Err(ConfigError::Empty("bootstrap_address"));
        }
        if self.topic_name.trim().is_empty() {
            return Err(ConfigError::Empty("topic_name"));
        }
        Ok(())
    }
}

/// Which value becomes the Kafka message key.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum KeyStrategy {
    /// A fresh UUID per send, unrelated to the event.
    #[default]
    Random,
    /// The event's own `eventId`.
    EventId,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PublisherConfig {
    #[serde(alias = "startOffset")]
    pub start_offset: i64,
    #[serde(alias = "minSleepSeconds")]
    pub min_sleep_seconds: u64,
    #[serde(alias = "maxSleepSeconds")]
    pub max_sleep_seconds: u64,
    pub key_strategy: KeyStrategy,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            start_offset: 10000,
            min_sleep_seconds: 1,
            max_sleep_seconds: 6,
            key_strategy: KeyStrategy::Random,
        }
    }
}

impl PublisherConfig {
    pub fn settings(&self) -> Result<LoopSettings, ConfigError> {
        Ok(LoopSettings {
            start_offset: self.start_offset,
            pacing: Pacing::new(self.min_sleep_seconds, self.max_sleep_seconds)?,
            key_strategy: self.key_strategy,
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    #[serde(alias = "startOffset")]
    pub start_offset: i64,
    #[serde(alias = "minSleepSeconds")]
    pub min_sleep_seconds: u64,
    #[serde(alias = "maxSleepSeconds")]
    pub max_sleep_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_offset: 10000,
            min_sleep_seconds: 1,
            max_sleep_seconds: 5,
        }
    }
}

impl GeneratorConfig {
    pub fn settings(&self) -> Result<LoopSettings, ConfigError> {
        Ok(LoopSettings {
            start_offset: self.start_offset,
            pacing: Pacing::new(self.min_sleep_seconds, self.max_sleep_seconds)?,
            key_strategy: KeyStrategy::Random,
        })
    }
}

/// Random whole-second delay between sends, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    min_seconds: u64,
    max_seconds: u64,
}

impl Pacing {
    pub fn new(min_seconds: u64, max_seconds: u64) -> Result<Self, ConfigError> {
        if min_seconds > max_seconds {
            return Err(ConfigError::SleepBounds {
                min: min_seconds,
                max: max_seconds,
            });
        }
        Ok(Self {
            min_seconds,
            max_seconds,
        })
    }

    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_secs(rng.gen_range(self.min_seconds..=self.max_seconds))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    pub start_offset: i64,
    pub pacing: Pacing,
    pub key_strategy: KeyStrategy,
}
