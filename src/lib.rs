use config::{Config, ConfigError};
use jobs::{status::StatusWatcher, ConsoleOperator, SystemClock};
use notifier::DiscordNotifier;
use practicum::client::{PracticumClient, PracticumError};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod jobs;
pub mod notifier;
pub mod practicum;

/// Startup failures. Anything after startup is handled inside the watcher loop.
#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Failed to set up the homework API client: {0}")]
    PracticumError(#[from] PracticumError),
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn start(config: Config) -> Result<(), WatcherError> {
    let practicum = PracticumClient::from_config(&config)?;
    let notifier = DiscordNotifier::from_credentials(&config.credentials);

    tracing::info!(
        endpoint = practicum.endpoint(),
        channel = config.credentials.channel_id.get(),
        "Homework watcher starting"
    );

    let mut watcher = StatusWatcher::new(
        practicum,
        notifier,
        SystemClock,
        config.settings.retry_interval,
    );
    let mut operator = ConsoleOperator::new();

    watcher.run(&mut operator).await;

    Ok(())
}
