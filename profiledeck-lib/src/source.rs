use crate::error::FetchError;
use crate::profile::Profile;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_ENDPOINT: &str = "https://randomuser.me/api/";

/// Anything that can hand out a batch of random profiles.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch(&self, results: usize) -> Result<Vec<Profile>, FetchError>;
}

#[derive(Deserialize)]
struct Envelope {
    results: Vec<Profile>,
}

/// Decode a response body, keeping only its `results` array.
pub fn decode_results(body: &[u8]) -> Result<Vec<Profile>, FetchError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    Ok(envelope.results)
}

#[derive(Clone, Debug)]
pub struct RandomUserSource {
    http: reqwest::Client,
    endpoint: String,
}

impl RandomUserSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UserSource for RandomUserSource {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, results: usize) -> Result<Vec<Profile>, FetchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("results", results)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let profiles = decode_results(&body)?;
        tracing::debug!("Fetched {} profiles", profiles.len());

        Ok(profiles)
    }
}
