//! LLM Client: the single point of entry for all calls to the hosted model.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Callers depend on the `Generator` trait; `GeminiClient` is the production backend.
//!
//! One request per call. No retries: failures are reported to the caller as-is.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::models::ImagePayload;

pub mod types;

use types::{ApiError, Content, GenerateContentRequest, GenerateContentResponse, Part};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("prompt blocked by the model: {reason}")]
    Blocked { reason: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Multimodal text generation: text parts plus images in, text out.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        text_parts: &[String],
        image_parts: &[ImagePayload],
    ) -> Result<String, LlmError>;
}

/// Gemini `generateContent` backend.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        api_base: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.api_base, self.model)
    }

    /// Confirms the credential is accepted and the model exists.
    pub async fn verify_model(&self) -> Result<(), LlmError> {
        let response = self
            .client
            .get(self.model_url())
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }
        Ok(())
    }

    /// Makes a raw call to the model, returning the full response object.
    pub async fn call(
        &self,
        text_parts: &[String],
        image_parts: &[ImagePayload],
    ) -> Result<GenerateContentResponse, LlmError> {
        let request_body = build_request(text_parts, image_parts);

        let response = self
            .client
            .post(format!("{}:generateContent", self.model_url()))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(
        &self,
        text_parts: &[String],
        image_parts: &[ImagePayload],
    ) -> Result<String, LlmError> {
        let response = self.call(text_parts, image_parts).await?;
        extract_text(response)
    }
}

/// Text parts first, then images, all in a single user turn.
fn build_request<'a>(
    text_parts: &'a [String],
    image_parts: &'a [ImagePayload],
) -> GenerateContentRequest<'a> {
    let parts = text_parts
        .iter()
        .map(|text| Part::Text {
            text: text.as_str(),
        })
        .chain(image_parts.iter().map(Part::from))
        .collect();

    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    if let Some(text) = response.text() {
        return Ok(text);
    }
    let reason = response
        .prompt_feedback
        .and_then(|f| f.block_reason)
        .or_else(|| {
            response
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.finish_reason)
                .filter(|r| r != "STOP")
        });
    match reason {
        Some(reason) => Err(LlmError::Blocked { reason }),
        None => Err(LlmError::EmptyContent),
    }
}

fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}
