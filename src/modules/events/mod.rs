mod generator;
pub mod models;

pub use generator::{generate_event, EVENT_PUBLISHER, MEASURE_CELSIUS};
pub use models::{DeviceEvent, DeviceReading, DeviceStatus, EventData};
