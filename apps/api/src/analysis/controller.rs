use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::dispatcher::InferenceDispatcher;
use crate::analysis::prompts::Action;
use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::pdf::DocumentConverter;

pub const RESPONSE_HEADING: &str = "The response is:";
pub const MISSING_DOCUMENT_MESSAGE: &str = "Please upload the file.";

/// What one interaction produced. Every failure is already a user-facing string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Response(String),
    MissingDocument,
    ConversionFailed(String),
    GenerationFailed(String),
}

impl Outcome {
    /// Heading shown above the text; only a successful response has one.
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            Outcome::Response(_) => Some(RESPONSE_HEADING),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<String, AppError> {
        match self {
            Outcome::Response(text) => Ok(text),
            Outcome::MissingDocument => Err(AppError::Validation(self.to_string())),
            Outcome::ConversionFailed(_) => Err(AppError::UnprocessableEntity(self.to_string())),
            Outcome::GenerationFailed(_) => Err(AppError::Llm(self.to_string())),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Response(text) => f.write_str(text),
            Outcome::MissingDocument => f.write_str(MISSING_DOCUMENT_MESSAGE),
            Outcome::ConversionFailed(e) => write!(f, "Error processing PDF: {e}"),
            Outcome::GenerationFailed(e) => write!(f, "Error generating response: {e}"),
        }
    }
}

/// Runs convert → select → dispatch for a single user action.
pub struct InteractionController {
    converter: Arc<dyn DocumentConverter>,
    dispatcher: InferenceDispatcher,
}

impl InteractionController {
    pub fn new(converter: Arc<dyn DocumentConverter>, dispatcher: InferenceDispatcher) -> Self {
        Self {
            converter,
            dispatcher,
        }
    }

    pub async fn handle(
        &self,
        action: Action,
        document: Option<ResumeDocument>,
        job_text: &str,
    ) -> Outcome {
        let Some(document) = document else {
            info!("No resume uploaded; nothing dispatched");
            return Outcome::MissingDocument;
        };

        let image = match self.converter.convert(&document).await {
            Ok(image) => image,
            Err(e) => {
                warn!("PDF conversion failed for '{}': {e}", document.filename);
                return Outcome::ConversionFailed(e.to_string());
            }
        };
        drop(document);

        match self.dispatcher.dispatch(job_text, action.prompt(), image).await {
            Ok(text) => {
                info!("Model response received ({} chars)", text.len());
                Outcome::Response(text)
            }
            Err(e) => {
                warn!("Model call failed: {e}");
                Outcome::GenerationFailed(e.to_string())
            }
        }
    }
}
