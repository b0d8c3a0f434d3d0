//! Simulated IoT device telemetry.
//!
//! Random `DeviceEvent` documents are produced by [`generate_event`] and pushed
//! by a [`PublisherLoop`] into an [`EventSink`]: Kafka for `device-publisher`,
//! standard output for `device-generator`.

pub mod errors;
pub mod logger;
pub mod modules;

pub use errors::{AppError, ConfigError, EventError, PublishError};
pub use modules::events::{generate_event, DeviceEvent, DeviceReading, DeviceStatus};
pub use modules::publisher::{
    load_configs, shutdown_on_ctrl_c, Configs, ConsoleSink, EventSink, KafkaSink, KeyStrategy,
    LoopSettings, Pacing, PublisherLoop, RunSummary,
};
