use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::practicum::{
    client::{PracticumClient, PracticumResult},
    HomeworkSource,
};

use super::{HomeworkError, HomeworkResult};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollRequest {
    #[serde(rename = "from_date")]
    pub from_timestamp: i64,
}

impl PracticumClient {
    pub async fn fetch_statuses(&self, from_timestamp: i64) -> PracticumResult<Value> {
        self.request::<Value, _>(&PollRequest { from_timestamp }).await
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_timestamp: i64) -> PracticumResult<Value> {
        self.fetch_statuses(from_timestamp).await
    }
}

/// Checks that the payload is an object carrying a `homeworks` array and returns it.
pub fn validate(raw: &Value) -> HomeworkResult<&[Value]> {
    let Some(object) = raw.as_object() else {
        return Err(HomeworkError::Shape("ответ API не является словарём"));
    };

    let homeworks = object
        .get("homeworks")
        .and_then(Value::as_array)
        .ok_or(HomeworkError::Shape("в ответе нет списка homeworks"))?;

    tracing::info!(count = homeworks.len(), "Homework API response accepted");

    Ok(homeworks.as_slice())
}

/// Server-side timestamp to resume from, if the payload carries a usable one.
pub fn current_date(raw: &Value) -> Option<i64> {
    raw.get("current_date").and_then(Value::as_i64)
}
