//! Replicate image generation client.
//!
//! Single blocking call against the flux predictions endpoint: the request
//! carries a `Prefer: wait` header, so the API holds the connection until the
//! generation finishes and the response already contains the image URL.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::ReplicateConfig;
use crate::providers::{ImageProvider, ImageRequest};

const PREDICTIONS_URL: &str =
    "https://api.replicate.com/v1/models/black-forest-labs/flux-1.1-pro-ultra/predictions";

/// Errors surfaced by the Replicate client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicateError {
    /// Construction without an API token.
    TokenRequired,
    /// Any non-created response status. The dispatcher needs no finer
    /// classification than this.
    BadRequest,
}

impl std::fmt::Display for ReplicateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplicateError::TokenRequired => write!(f, "replicate token required"),
            ReplicateError::BadRequest => write!(f, "bad request"),
        }
    }
}

impl std::error::Error for ReplicateError {}

/// Request body: `{"input": {"prompt": ..., "ratio": ...}}`.
#[derive(Debug, serde::Serialize)]
pub struct PredictionRequest<'a> {
    pub input: &'a ImageRequest,
}

/// The slice of the prediction response the bot cares about.
#[derive(Debug, Deserialize)]
pub struct PredictionResponse {
    /// URL of the generated image.
    pub output: String,
}

/// HTTP client for the Replicate predictions API.
pub struct ReplicateService {
    token: String,
    url: String,
    http: reqwest::Client,
}

impl ReplicateService {
    /// Builds the service. Fails when the token is empty.
    pub fn new(config: &ReplicateConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(ReplicateError::TokenRequired.into());
        }

        Ok(Self {
            token: config.token.clone(),
            url: PREDICTIONS_URL.to_string(),
            http: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl ImageProvider for ReplicateService {
    async fn generate_image(&self, request: &ImageRequest) -> Result<String> {
        debug!(ratio = %request.ratio, "submitting image generation request");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .header("Prefer", "wait")
            .json(&PredictionRequest { input: request })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::CREATED {
            error!(
                status = %status,
                body = %body,
                "image generation request failed"
            );
            return Err(ReplicateError::BadRequest.into());
        }

        let prediction: PredictionResponse = serde_json::from_str(&body)?;
        Ok(prediction.output)
    }
}
