pub mod client;
pub mod handlers;

use async_trait::async_trait;
use serde_json::Value;

use client::PracticumResult;

/// Anything that can answer "what changed since `from_timestamp`".
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Returns the decoded but unvalidated payload.
    async fn fetch(&self, from_timestamp: i64) -> PracticumResult<Value>;
}
