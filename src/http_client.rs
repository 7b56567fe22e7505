//! Shared outbound HTTP client for master -> worker calls, with bounded
//! retry on transport-level failure (`spec.md` §4.5/§4.6 fan-out).

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::EndpointsConfig;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct WorkerClient {
    client: reqwest::Client,
    max_retries: u32,
}

impl WorkerClient {
    pub fn new(endpoints: EndpointsConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(endpoints.timeout_secs))
            .build()
            .map_err(AppError::from)?;
        Ok(Self {
            client,
            max_retries: endpoints.max_retries,
        })
    }

    /// POST `body` to `url`, retrying transport failures up to
    /// `max_retries` times with no backoff (the workers are on the same
    /// bridge network; failures are almost always a container still
    /// starting up, not sustained unavailability).
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, AppError> {
        let mut attempt = 0;
        loop {
            let result = self.client.post(url).json(body).send().await;
            match result {
                Ok(resp) if resp.status().is_success() => {
                    return resp.json::<R>().await.map_err(AppError::from);
                }
                Ok(resp) => {
                    let status = resp.status();
                    let text = resp.text().await.unwrap_or_default();
                    return Err(AppError::Worker(format!(
                        "worker call to {url} failed with status {status}: {text}"
                    )));
                }
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(url, attempt, error = %e, "retrying worker call");
                    continue;
                }
                Err(e) => return Err(AppError::from(e)),
            }
        }
    }
}
