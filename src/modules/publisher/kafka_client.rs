use log::{debug, error, info, warn};
use rdkafka::{
    producer::{FutureProducer, FutureRecord, Producer},
    util::Timeout,
    ClientConfig,
};
use std::time::Duration;

use super::{config::KafkaConfig, sink::EventSink};
use crate::errors::PublishError;

/// One producer per process. Queued messages are flushed when the sink is dropped.
pub struct KafkaSink {
    producer: FutureProducer,
    topic: String,
    flush_timeout: Duration,
}

impl KafkaSink {
    pub fn connect(config: &KafkaConfig) -> Result<Self, PublishError> {
        config.validate()?;

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.bootstrap_address)
            .set("client.id", &config.client_id)
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .create()
            .map_err(PublishError::Client)?;

        info!(
            "Kafka producer created for '{}' (topic '{}')",
            config.bootstrap_address, config.topic_name
        );

        Ok(KafkaSink {
            producer,
            topic: config.topic_name.clone(),
            flush_timeout: Duration::from_millis(config.flush_timeout_ms),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl EventSink for KafkaSink {
    async fn send(&mut self, key: &str, payload: &str) -> Result<(), PublishError> {
        info!("{}", "=".repeat(90));
        info!("data : {}", payload);
        info!("{}", "=".repeat(90));

        let record = FutureRecord::to(&self.topic).key(key).payload(payload);

        match self.producer.send(record, Timeout::Never).await {
            Ok(delivery) => {
                debug!("Delivered to topic '{}': {:?}", self.topic, delivery);
                info!("Data is posted to topic '{}'", self.topic);
                Ok(())
            }
            Err((e, _message)) => {
                error!("Failed to send data to topic '{}': {}", self.topic, e);
                Err(PublishError::Send {
                    topic: self.topic.clone(),
                    source: e,
                })
            }
        }
    }
}

impl Drop for KafkaSink {
    fn drop(&mut self) {
        match self.producer.flush(self.flush_timeout) {
            Ok(()) => info!("Kafka producer for topic '{}' released", self.topic),
            Err(e) => warn!(
                "Kafka producer for topic '{}' released with undelivered messages: {}",
                self.topic, e
            ),
        }
    }
}
