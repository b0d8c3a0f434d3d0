use device_events::{load_configs, logger, shutdown_on_ctrl_c, AppError, ConsoleSink, PublisherLoop};
use log::{error, info};

#[tokio::main]
async fn main() {
    logger::start_log();

    if let Err(e) = run().await {
        error!("Generator failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let configs = load_configs()?;
    let settings = configs.generator.settings()?;
    let shutdown = shutdown_on_ctrl_c();

    let mut generator = PublisherLoop::new(ConsoleSink::stdout(), settings);
    let summary = generator.run(&shutdown).await?;

    info!("Generated {} events", summary.events_sent);
    Ok(())
}
