//! Remote multimodal model access.
//!
//! [`VisionModel`] is the seam the scanner depends on: one prompt plus one
//! image in, reply text out. [`GeminiClient`] implements it over the Gemini
//! `generateContent` REST call.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::config::GeminiConfig;
use crate::image::ScanRequest;

/// A model that answers a text prompt about one image.
pub trait VisionModel: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
        image: &ScanRequest,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

/// Errors from calling the remote model.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No API key configured (set GOOGLE_API_KEY)")]
    MissingApiKey,

    #[error("Cannot connect to model at {0}: {1}")]
    Connection(String, String),

    #[error("Model API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    #[error("Request was blocked by the model: {0}")]
    Blocked(String),

    #[error("Model returned no candidate content")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Gemini `generateContent` client.
///
/// # Example
/// ```no_run
/// use halal_scan::{GeminiClient, GeminiConfig, ScanRequest, VisionModel};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClient::new(GeminiConfig::from_env());
/// let image = ScanRequest::from_path(Path::new("label.jpg"))?;
/// let text = client.generate("What is written here?", &image).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Use a custom `reqwest::Client` (for proxies, TLS, connection pooling).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl VisionModel for GeminiClient {
    async fn generate(&self, prompt: &str, image: &ScanRequest) -> Result<String, ServiceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingApiKey)?;

        let body = build_request(prompt, image, self.config.temperature);
        let url = self.config.generate_url();

        tracing::debug!(
            model = %self.config.model,
            mime = image.mime_type(),
            bytes = image.bytes().len(),
            "sending label image to model"
        );

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Model request failed: {}", e);
                ServiceError::Connection(self.config.endpoint.clone(), e.to_string())
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("Model API error: {} - {}", status, text);
            return Err(ServiceError::Api { status, body: text });
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| {
            tracing::error!("Failed to decode model response: {}", e);
            ServiceError::InvalidResponse(e.to_string())
        })?;

        extract_text(parsed)
    }
}

fn build_request<'a>(
    prompt: &'a str,
    image: &'a ScanRequest,
    temperature: Option<f32>,
) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type(),
                        data: image.to_base64(),
                    },
                },
            ],
        }],
        generation_config: temperature.map(|temperature| GenerationConfig { temperature }),
    }
}

/// Concatenate the text parts of the first candidate.
///
/// Empty text is still a reply and is left to the parsers; only a missing
/// candidate or missing content is an error.
fn extract_text(resp: GenerateResponse) -> Result<String, ServiceError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ServiceError::Blocked(reason));
    }

    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .ok_or(ServiceError::EmptyResponse)
}
