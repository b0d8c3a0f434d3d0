use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::{
    config::{KeyStrategy, LoopSettings},
    sink::EventSink,
};
use crate::{errors::PublishError, modules::events::DeviceEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub events_sent: u64,
    pub next_offset: i64,
}

/// Generates, sends and paces events until cancelled or a send fails.
pub struct PublisherLoop<S> {
    sink: S,
    settings: LoopSettings,
    rng: StdRng,
    offset: i64,
}

impl<S: EventSink> PublisherLoop<S> {
    pub fn new(sink: S, settings: LoopSettings) -> Self {
        Self::with_rng(sink, settings, StdRng::from_entropy())
    }

    pub fn with_rng(sink: S, settings: LoopSettings, rng: StdRng) -> Self {
        PublisherLoop {
            sink,
            offset: settings.start_offset,
            settings,
            rng,
        }
    }

    /// Offset the next event will carry.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// The first send error ends the run; nothing is retried. So does running
    /// out of offsets after `i64::MAX`.
    pub async fn run(&mut self, shutdown: &CancellationToken) -> Result<RunSummary, PublishError> {
        let mut events_sent = 0;
        info!("Publishing events starting at offset {}", self.offset);

        while !shutdown.is_cancelled() {
            self.publish_next().await?;
            events_sent += 1;

            let delay = self.settings.pacing.next_delay(&mut self.rng);
            debug!("Sleeping {:?} before next event", delay);
            tokio::select! {
                _ = shutdown.cancelled() => info!("Shutdown requested, stopping publisher"),
                _ = sleep(delay) => {}
            }

            self.offset = self
                .offset
                .checked_add(1)
                .ok_or(PublishError::OffsetExhausted(self.offset))?;
        }

        info!(
            "Publisher stopped after {} events, next offset {}",
            events_sent, self.offset
        );
        Ok(RunSummary {
            events_sent,
            next_offset: self.offset,
        })
    }

    async fn publish_next(&mut self) -> Result<(), PublishError> {
        let event = DeviceEvent::generate(&mut self.rng, self.offset);
        let payload = event.to_document()?;
        let key = match self.settings.key_strategy {
            KeyStrategy::Random => uuid::Uuid::new_v4().to_string(),
            KeyStrategy::EventId => event.event_id.to_string(),
        };

        debug!("Event {} keyed {}", self.offset, key);
        self.sink.send(&key, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::PublishError, modules::publisher::config::Pacing};
    use rdkafka::error::{KafkaError, RDKafkaErrorCode};
    use std::collections::HashSet;

    /// Records every message and cancels once `stop_after` have arrived.
    struct RecordingSink {
        sent: Vec<(String, String)>,
        stop_after: usize,
        shutdown: CancellationToken,
    }

    impl EventSink for RecordingSink {
        async fn send(&mut self, key: &str, payload: &str) -> Result<(), PublishError> {
            self.sent.push((key.to_string(), payload.to_string()));
            if self.sent.len() >= self.stop_after {
                self.shutdown.cancel();
            }
            Ok(())
        }
    }

    struct FailingSink {
        attempts: usize,
        fail_on: usize,
    }

    impl EventSink for FailingSink {
        async fn send(&mut self, _key: &str, _payload: &str) -> Result<(), PublishError> {
            self.attempts += 1;
            if self.attempts == self.fail_on {
                return Err(PublishError::Send {
                    topic: "device-data".to_string(),
                    source: KafkaError::MessageProduction(RDKafkaErrorCode::BrokerTransportFailure),
                });
            }
            Ok(())
        }
    }

    fn settings(key_strategy: KeyStrategy) -> LoopSettings {
        LoopSettings {
            start_offset: 10000,
            pacing: Pacing::new(0, 0).unwrap(),
            key_strategy,
        }
    }

    fn recording(stop_after: usize, shutdown: &CancellationToken) -> RecordingSink {
        RecordingSink {
            sent: Vec::new(),
            stop_after,
            shutdown: shutdown.clone(),
        }
    }

    fn offsets(sent: &[(String, String)]) -> Vec<i64> {
        sent.iter()
            .map(|(_, payload)| DeviceEvent::from_document(payload).unwrap().event_offset)
            .collect()
    }

    #[tokio::test]
    async fn test_offsets_increase_by_one() {
        let shutdown = CancellationToken::new();
        let mut publisher = PublisherLoop::with_rng(
            recording(4, &shutdown),
            settings(KeyStrategy::Random),
            StdRng::seed_from_u64(1),
        );

        let summary = publisher.run(&shutdown).await.unwrap();
        assert_eq!(
            summary,
            RunSummary {
                events_sent: 4,
                next_offset: 10004
            }
        );
        assert_eq!(publisher.offset(), 10004);

        let sink = publisher.into_sink();
        assert_eq!(offsets(&sink.sent), [10000, 10001, 10002, 10003]);
    }

    #[tokio::test]
    async fn test_random_keys_are_unrelated_to_event_ids() {
        let shutdown = CancellationToken::new();
        let mut publisher = PublisherLoop::new(recording(5, &shutdown), settings(KeyStrategy::Random));
        publisher.run(&shutdown).await.unwrap();

        let sink = publisher.into_sink();
        let keys: HashSet<_> = sink.sent.iter().map(|(key, _)| key.clone()).collect();
        assert_eq!(keys.len(), 5);

        for (key, payload) in &sink.sent {
            let event = DeviceEvent::from_document(payload).unwrap();
            assert!(uuid::Uuid::parse_str(key).is_ok());
            assert_ne!(key, &event.event_id.to_string());
        }
    }

    #[tokio::test]
    async fn test_event_id_key_strategy() {
        let shutdown = CancellationToken::new();
        let mut publisher = PublisherLoop::new(recording(3, &shutdown), settings(KeyStrategy::EventId));
        publisher.run(&shutdown).await.unwrap();

        for (key, payload) in &publisher.into_sink().sent {
            let event = DeviceEvent::from_document(payload).unwrap();
            assert_eq!(key, &event.event_id.to_string());
        }
    }

    #[tokio::test]
    async fn test_send_failure_stops_the_loop() {
        let shutdown = CancellationToken::new();
        let sink = FailingSink {
            attempts: 0,
            fail_on: 2,
        };
        let mut publisher = PublisherLoop::new(sink, settings(KeyStrategy::Random));

        let result = publisher.run(&shutdown).await;
        assert!(matches!(result, Err(PublishError::Send { .. })));
        assert_eq!(publisher.offset(), 10001);
        assert_eq!(publisher.into_sink().attempts, 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_sends_nothing() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let mut publisher = PublisherLoop::new(recording(1, &shutdown), settings(KeyStrategy::Random));

        let summary = publisher.run(&shutdown).await.unwrap();
        assert_eq!(summary.events_sent, 0);
        assert_eq!(summary.next_offset, 10000);
        assert!(publisher.into_sink().sent.is_empty());
    }

    #[tokio::test]
    async fn test_last_offset_ends_run_with_error() {
        let shutdown = CancellationToken::new();
        let last = LoopSettings {
            start_offset: i64::MAX,
            ..settings(KeyStrategy::Random)
        };
        let mut publisher = PublisherLoop::new(recording(1, &shutdown), last);

        let result = publisher.run(&shutdown).await;
        assert!(matches!(result, Err(PublishError::OffsetExhausted(i64::MAX))));
        assert_eq!(publisher.offset(), i64::MAX);
        assert_eq!(offsets(&publisher.into_sink().sent), [i64::MAX]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_pacing() {
        let shutdown = CancellationToken::new();
        let long_pause = LoopSettings {
            pacing: Pacing::new(3600, 3600).unwrap(),
            ..settings(KeyStrategy::Random)
        };
        let mut publisher = PublisherLoop::new(recording(usize::MAX, &shutdown), long_pause);

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            sleep(std::time::Duration::from_secs(10)).await;
            trigger.cancel();
        });

        let started = tokio::time::Instant::now();
        let summary = publisher.run(&shutdown).await.unwrap();
        assert_eq!(summary.events_sent, 1);
        assert!(started.elapsed() < std::time::Duration::from_secs(3600));
    }
}
