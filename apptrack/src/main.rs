use apptrack::{AppConfig, Cli, run};
use apptrack_engine::Tracker;
use apptrack_sqlite::Db;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so that stdout carries only the JSON result
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::import()?;
    let config = AppConfig::load(&cli)?;

    let db = Db::open(&config.database).await?;
    let tracker = Tracker::new(db);

    run(&tracker, &config, cli.command, std::io::stdout().lock()).await
}
