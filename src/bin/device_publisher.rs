use device_events::{
    load_configs, logger, shutdown_on_ctrl_c, AppError, KafkaSink, PublisherLoop,
};
use log::{error, info};

#[tokio::main]
async fn main() {
    logger::start_log();

    if let Err(e) = run().await {
        error!("Publisher failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let configs = load_configs()?;
    let settings = configs.publisher.settings()?;
    let shutdown = shutdown_on_ctrl_c();

    let sink = KafkaSink::connect(&configs.kafka)?;
    let mut publisher = PublisherLoop::new(sink, settings);
    let summary = publisher.run(&shutdown).await?;

    info!(
        "Published {} events to topic '{}'",
        summary.events_sent, configs.kafka.topic_name
    );
    Ok(())
}
