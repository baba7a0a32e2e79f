use super::HashLookup;
use crate::batch::Batch;
use crate::config::RunConfig;
use crate::error::LookupError;
use crate::types::LookupResult;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Name of the form field carrying the delimited hash list.
const HASHES_FIELD: &str = "hashes";

/// Talks to the `/bulk` endpoint of an NSRL server.
pub struct BulkLookupClient {
    client: Client,
    url: String,
}

impl BulkLookupClient {
    pub fn new(config: &RunConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().pool_max_idle_per_host(1);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: config.bulk_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HashLookup for BulkLookupClient {
    async fn submit(&self, batch: &Batch) -> Result<Vec<LookupResult>, LookupError> {
        // `form` sets the urlencoded content type and a fixed Content-Length.
        let resp = self
            .client
            .post(&self.url)
            .form(&[(HASHES_FIELD, batch.encode())])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "bulk lookup rejected");
            return Err(LookupError::BadStatus(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let results: Vec<LookupResult> = serde_json::from_slice(&body)?;
        Ok(results)
    }
}
