use serde::{Deserialize, Serialize};

use crate::errors::EventError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceStatus {
    Success,
    Error,
    Standby,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReading {
    #[serde(rename = "deviceId")]
    pub device_id: Option<String>,
    pub measure: String,
    pub status: Option<DeviceStatus>,
    pub temperature: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    pub devices: Vec<DeviceReading>,
}

/// One simulated telemetry record. Readings travel nested under `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEvent {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    pub data: EventData,
    #[serde(rename = "eventId")]
    pub event_id: uuid::Uuid,
    #[serde(rename = "eventOffset")]
    pub event_offset: i64,
    #[serde(rename = "eventPublisher")]
    pub event_publisher: String,
    #[serde(rename = "eventTime")]
    pub event_time: String,
}

impl DeviceEvent {
    pub fn devices(&self) -> &[DeviceReading] {
        &self.data.devices
    }

    pub fn to_document(&self) -> Result<String, EventError> {
        serde_json::to_string(self).map_err(EventError::Serialize)
    }

    pub fn from_document(document: &str) -> Result<Self, EventError> {
        serde_json::from_str(document).map_err(EventError::Parse)
    }
}
