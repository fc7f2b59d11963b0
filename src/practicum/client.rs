use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, USER_AGENT},
    StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::config::Config;

const AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum PracticumError {
    #[error("Homework API is unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Homework API answered with status {0}")]
    Remote(StatusCode),
    #[error("Homework API returned a body that is not JSON: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("Failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to parse header")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl From<reqwest::Error> for PracticumError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e)
        } else {
            Self::Transport(e)
        }
    }
}

impl PracticumError {
    /// Fetch-layer failures are retried on the next cycle without telling the user.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Remote(_) | Self::Decode(_)
        )
    }
}

pub type PracticumResult<T> = Result<T, PracticumError>;

pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
}

impl PracticumClient {
    pub fn new(
        token: &str,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> PracticumResult<Self> {
        let mut headers = HeaderMap::new();

        let mut authorization: HeaderValue = format!("OAuth {token}").parse()?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(USER_AGENT, AGENT.parse()?);

        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(PracticumError::Client)?,
            endpoint: endpoint.into(),
            headers,
        })
    }

    pub fn from_config(config: &Config) -> PracticumResult<Self> {
        Self::new(
            &config.credentials.practicum_token,
            config.settings.endpoint.clone(),
            config.settings.request_timeout,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn request<T, Q>(&self, query: &Q) -> PracticumResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self
            .http
            .get(&self.endpoint)
            .headers(self.headers.clone())
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PracticumError::Remote(status));
        }

        Ok(resp.json::<T>().await?)
    }
}
