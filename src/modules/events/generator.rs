//! Random device-event builder.
//!
//! Pools and weights:
//! - customers `CI00100`..`CI00299`, uniform
//! - devices `D001`..`D008` plus a missing id, uniform over 9 options
//! - 1 to 10 readings per event
//! - status SUCCESS / ERROR / STANDBY / missing, uniform
//! - temperature 0 to 50 °C

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::ops::RangeInclusive;

use super::models::{DeviceEvent, DeviceReading, DeviceStatus, EventData};
use crate::errors::EventError;

pub const EVENT_PUBLISHER: &str = "device";
pub const MEASURE_CELSIUS: &str = "C";

const CUSTOMER_PREFIX: &str = "CI";
const CUSTOMER_SUFFIXES: RangeInclusive<u32> = 100..=299;
const DEVICE_PREFIX: &str = "D";
const DEVICE_SUFFIXES: RangeInclusive<u32> = 1..=8;
const READINGS_PER_EVENT: RangeInclusive<usize> = 1..=10;
const TEMPERATURE_CELSIUS: RangeInclusive<u8> = 0..=50;

const STATUS_CHOICES: [Option<DeviceStatus>; 4] = [
    Some(DeviceStatus::Success),
    Some(DeviceStatus::Error),
    Some(DeviceStatus::Standby),
    None,
];

const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Builds one event with a fresh entropy-seeded rng and serializes it.
pub fn generate_event(offset: i64) -> Result<String, EventError> {
    let mut rng = StdRng::from_entropy();
    DeviceEvent::generate(&mut rng, offset).to_document()
}

impl DeviceEvent {
    /// `offset` is copied into `eventOffset` as is.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, offset: i64) -> Self {
        let readings = rng.gen_range(READINGS_PER_EVENT);
        let devices = (0..readings).map(|_| random_reading(rng)).collect();

        DeviceEvent {
            customer_id: random_customer_id(rng),
            data: EventData { devices },
            event_id: uuid::Uuid::new_v4(),
            event_offset: offset,
            event_publisher: EVENT_PUBLISHER.to_string(),
            event_time: chrono::Local::now().format(EVENT_TIME_FORMAT).to_string(),
        }
    }
}

fn random_customer_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}{:05}", CUSTOMER_PREFIX, rng.gen_range(CUSTOMER_SUFFIXES))
}

fn random_device_id<R: Rng + ?Sized>(rng: &mut R) -> Option<String> {
    // One extra slot past the pool stands for a device reporting without an id.
    let pick = rng.gen_range(*DEVICE_SUFFIXES.start()..=*DEVICE_SUFFIXES.end() + 1);
    DEVICE_SUFFIXES
        .contains(&pick)
        .then(|| format!("{}{:03}", DEVICE_PREFIX, pick))
}

fn random_reading<R: Rng + ?Sized>(rng: &mut R) -> DeviceReading {
    DeviceReading {
        device_id: random_device_id(rng),
        measure: MEASURE_CELSIUS.to_string(),
        status: STATUS_CHOICES.choose(rng).copied().flatten(),
        temperature: rng.gen_range(TEMPERATURE_CELSIUS),
    }
}
