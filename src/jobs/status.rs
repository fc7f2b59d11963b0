use std::{fmt, time::Duration};

use serde_json::Value;

use crate::{
    notifier::Notify,
    practicum::{
        client::PracticumResult,
        handlers::{
            homeworks::{current_date, validate},
            status::interpret,
            HomeworkResult,
        },
        HomeworkSource,
    },
};

use super::{Clock, Operator};

pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Everything the watcher remembers between polls. Lost on restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatcherState {
    pub last_notified_message: String,
    pub time_cursor: i64,
}

/// What a single poll ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The API could not be reached or decoded; retried silently.
    FetchFailed,
    /// Nothing new since the cursor.
    NoUpdates,
    Unchanged,
    StatusNotified,
    FailureNotified,
    /// Same failure as last time; not sent again.
    FailureSuppressed,
}

pub struct StatusWatcher<S, N, C> {
    source: S,
    notifier: N,
    clock: C,
    retry_interval: Duration,
    state: WatcherState,
}

impl<S, N, C> StatusWatcher<S, N, C>
where
    S: HomeworkSource,
    N: Notify,
    C: Clock,
{
    pub fn new(source: S, notifier: N, clock: C, retry_interval: Duration) -> Self {
        let time_cursor = clock.now();

        Self {
            source,
            notifier,
            clock,
            retry_interval,
            state: WatcherState {
                last_notified_message: String::new(),
                time_cursor,
            },
        }
    }

    pub fn state(&self) -> &WatcherState {
        &self.state
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// One fetch/compare/notify cycle, without the trailing sleep.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let fetched = self.source.fetch(self.state.time_cursor).await;
        self.handle(fetched).await
    }

    /// Polls until the operator confirms a stop.
    pub async fn run<O: Operator>(&mut self, operator: &mut O) {
        tracing::info!(
            cursor = self.state.time_cursor,
            interval = ?self.retry_interval,
            "Watching homework statuses"
        );

        loop {
            let fetched = tokio::select! {
                fetched = self.source.fetch(self.state.time_cursor) => fetched,
                _ = operator.interrupted() => {
                    if operator.confirm_stop().await {
                        break;
                    }
                    continue;
                }
            };

            let outcome = self.handle(fetched).await;
            tracing::debug!(?outcome, cursor = self.state.time_cursor, "Poll finished");

            tokio::select! {
                _ = self.clock.sleep(self.retry_interval) => {}
                _ = operator.interrupted() => {
                    if operator.confirm_stop().await {
                        break;
                    }
                }
            }
        }

        tracing::info!("Stopped watching homework statuses");
    }

    async fn handle(&mut self, fetched: PracticumResult<Value>) -> PollOutcome {
        let raw = match fetched {
            Ok(raw) => raw,
            Err(e) if e.is_retryable() => {
                tracing::error!(
                    error = %e,
                    cursor = self.state.time_cursor,
                    "Homework API request failed, retrying later"
                );
                return PollOutcome::FetchFailed;
            }
            Err(e) => {
                tracing::error!(error = %e, "Homework API client is misconfigured");
                return self.report_failure(&e).await;
            }
        };

        let outcome = match latest_message(&raw) {
            Ok(None) => PollOutcome::NoUpdates,
            Ok(Some(message)) if message == self.state.last_notified_message => {
                tracing::debug!("Homework status unchanged");
                PollOutcome::Unchanged
            }
            Ok(Some(message)) => {
                self.publish(message).await;
                PollOutcome::StatusNotified
            }
            Err(e) => {
                tracing::error!(error = %e, "Homework API response rejected");
                self.report_failure(&e).await
            }
        };

        if let Some(cursor) = current_date(&raw) {
            self.state.time_cursor = cursor;
        }

        outcome
    }

    /// Tells the user about a failure unless it is the one they saw last.
    async fn report_failure(&mut self, e: impl fmt::Display) -> PollOutcome {
        let message = format!("{FAILURE_PREFIX} {e}");
        if message == self.state.last_notified_message {
            PollOutcome::FailureSuppressed
        } else {
            self.publish(message).await;
            PollOutcome::FailureNotified
        }
    }

    async fn publish(&mut self, message: String) {
        self.notifier.notify(&message).await;
        self.state.last_notified_message = message;
    }
}

/// Only the most recent submission is tracked.
fn latest_message(raw: &Value) -> HomeworkResult<Option<String>> {
    validate(raw)?.first().map(interpret).transpose()
}
