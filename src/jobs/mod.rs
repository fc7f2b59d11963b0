use std::{
    io,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin},
    sync::mpsc,
};

pub mod status;

/// Wall clock and timer used by the watcher, swapped out in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Unix seconds.
    fn now(&self) -> i64;

    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Whoever may stop the watcher.
#[async_trait]
pub trait Operator: Send {
    /// Resolves once a stop has been requested.
    async fn interrupted(&mut self);

    /// Asked after an interrupt; `true` stops the watcher for good.
    async fn confirm_stop(&mut self) -> bool;
}

/// Ctrl-C followed by a yes/no question on the terminal.
pub struct ConsoleOperator {
    signals: mpsc::UnboundedReceiver<()>,
    input: Lines<BufReader<Stdin>>,
}

impl ConsoleOperator {
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let (tx, signals) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Unable to listen for Ctrl-C: {e}");
                    break;
                }
                if tx.send(()).is_err() {
                    break;
                }
            }
        });

        Self {
            signals,
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl Operator for ConsoleOperator {
    async fn interrupted(&mut self) {
        if self.signals.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    async fn confirm_stop(&mut self) -> bool {
        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(b"Stop watching homework statuses? [y/N] ").await;
        let _ = stdout.flush().await;

        let answer = self.input.next_line().await;

        // Ctrl-C presses made while the prompt was open are already answered.
        while self.signals.try_recv().is_ok() {}

        decide(answer)
    }
}

/// An answer that cannot be read counts as a confirmed stop.
fn decide(answer: io::Result<Option<String>>) -> bool {
    match answer {
        Ok(Some(line)) => is_yes(&line),
        Ok(None) => {
            tracing::warn!("Input closed before confirmation, stopping");
            true
        }
        Err(e) => {
            tracing::warn!("Could not read confirmation, stopping: {e}");
            true
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "д" | "да"
    )
}
