//! Outbound call to the summarization service.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::types::ChatRequest;

/// Delivers one chat request and returns the raw body of a successful response.
#[async_trait]
pub trait SummaryTransport: Send + Sync {
  async fn send(&self, request: &ChatRequest) -> Result<String, SummaryError>;
}

/// reqwest-backed transport for an OpenAI-compatible endpoint.
pub struct HttpTransport {
  client: Client,
  endpoint: String,
  api_key: Option<String>,
}

impl HttpTransport {
  pub fn new(config: &SummaryConfig) -> Result<Self, SummaryError> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    Ok(Self {
      client: builder.build()?,
      endpoint: config.endpoint.clone(),
      api_key: config.api_key.clone(),
    })
  }
}

#[async_trait]
impl SummaryTransport for HttpTransport {
  async fn send(&self, request: &ChatRequest) -> Result<String, SummaryError> {
    let api_key = self.api_key.as_deref().ok_or(SummaryError::MissingApiKey)?;

    let payload = serde_json::to_vec(request)?;
    debug!(
      endpoint = %self.endpoint,
      model = %request.model,
      bytes = payload.len(),
      "posting chat request"
    );
    let response = self
      .client
      .post(&self.endpoint)
      .header(CONTENT_TYPE, "application/json")
      .bearer_auth(api_key)
      .body(payload)
      .send()
      .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
      return Err(SummaryError::Status {
        status: status.as_u16(),
        body,
      });
    }
    debug!(bytes = body.len(), "chat response received");
    Ok(body)
  }
}
