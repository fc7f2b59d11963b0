use homework_watcher::{config::Config, WatcherError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), WatcherError> {
    dotenvy::dotenv().ok();
    homework_watcher::init_tracing();

    let config = Config::from_env()
        .inspect_err(|e| tracing::error!("Refusing to start, configuration missing: {e}"))?;

    homework_watcher::start(config).await?;

    Ok(())
}
