use std::sync::Arc;

use crate::llm_client::{Generator, LlmError};
use crate::models::ImagePayload;

/// Sends one job description + template + page image to the model.
#[derive(Clone)]
pub struct InferenceDispatcher {
    generator: Arc<dyn Generator>,
}

impl InferenceDispatcher {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// One outbound call per invocation; nothing is cached or retried.
    pub async fn dispatch(
        &self,
        job_text: &str,
        prompt: &str,
        image: ImagePayload,
    ) -> Result<String, LlmError> {
        let text_parts = [compose_prompt(job_text, prompt)];
        self.generator
            .generate(&text_parts, std::slice::from_ref(&image))
            .await
    }
}

/// The text block sent alongside the image.
pub fn compose_prompt(job_text: &str, prompt: &str) -> String {
    format!("Job Description: {job_text}\n\n{prompt}")
}
