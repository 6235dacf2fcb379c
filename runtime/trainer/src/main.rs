mod config;
mod train;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TrainConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "trainer=info,detector=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TrainConfig::load();
    let summary = train::run(&config)?;

    tracing::info!(
        samples = summary.samples,
        flagged = summary.flagged,
        attacks_flagged = summary.attacks_flagged,
        "Training finished"
    );
    println!("Model persisted to {}", summary.output.display());

    Ok(())
}
