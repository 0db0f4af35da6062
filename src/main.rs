use confluence::config::Config;
use confluence::{pipeline, report};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confluence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        "Tracking {} ({}) in {}:{}",
        config.symbol,
        config.timeframe,
        config.database_path.display(),
        config.price_table
    );

    let run = pipeline::run(&config).await?;

    if run.fetch.is_failed() {
        warn!("Continuing with previously stored candles only");
    }

    println!("{}", report::render(&run.counts, &run.rows));
    Ok(())
}
