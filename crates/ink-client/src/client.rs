//! Recognition client.
//!
//! One POST per run, no retries. Transport failures and non-success
//! statuses are `RecognitionUnavailable`; a body that does not decode is
//! `MalformedResponse`.

use crate::config::ClientConfig;
use async_trait::async_trait;
use ink_core::{InkError, RecognitionItem, RecognitionRequest, Result, decode_response};

/// Anything that can turn a sketch request into recognized items.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, request: &RecognitionRequest) -> Result<Vec<RecognitionItem>>;
}

pub struct HttpRecognizer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRecognizer {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InkError::RecognitionUnavailable(format!("client setup: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn unavailable(e: reqwest::Error) -> InkError {
    InkError::RecognitionUnavailable(e.to_string())
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, request: &RecognitionRequest) -> Result<Vec<RecognitionItem>> {
        log::debug!(
            "POST {} ({} byte image, {} variable(s))",
            self.endpoint,
            request.image.len(),
            request.variables.len()
        );
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(InkError::RecognitionUnavailable(format!(
                "{} returned {status}",
                self.endpoint
            )));
        }

        let body = response.bytes().await.map_err(unavailable)?;
        let items = decode_response(&body)?;
        log::debug!("recognized {} item(s)", items.len());
        Ok(items)
    }
}
