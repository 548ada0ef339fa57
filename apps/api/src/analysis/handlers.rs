//! Axum route handlers for the page and the analysis API.

use axum::{
    extract::{Multipart, State},
    response::Html,
    Json,
};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::controller::{Outcome, RESPONSE_HEADING};
use crate::analysis::form::{parse_multipart, AnalysisForm};
use crate::analysis::prompts::Action;
use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::page::render_page;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub interaction_id: Uuid,
    pub action: Action,
    pub heading: &'static str,
    pub response: String,
}

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Html<String> {
    render_page(&state.config.gemini_model, "", None)
}

/// POST /
///
/// Form submission from the page. Renders the page again with the outcome;
/// a post without a pressed button is treated as idle.
pub async fn handle_form(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let form = parse_multipart(multipart).await?;
    let model = &state.config.gemini_model;

    let Some(action) = form.action() else {
        return Ok(render_page(model, &form.job_description, None));
    };

    let AnalysisForm {
        job_description,
        document,
        ..
    } = form;
    let (_, outcome) = run_interaction(&state, action, document, &job_description).await;
    Ok(render_page(model, &job_description, Some(&outcome)))
}

/// POST /api/v1/analyze
///
/// Same multipart fields as the page form; returns the model text as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = parse_multipart(multipart).await?;

    let action = form.action().ok_or_else(|| {
        AppError::Validation(
            "an action is required: overview, skill_gap or match_percentage".to_string(),
        )
    })?;

    let (interaction_id, outcome) =
        run_interaction(&state, action, form.document, &form.job_description).await;

    Ok(Json(AnalyzeResponse {
        interaction_id,
        action,
        heading: RESPONSE_HEADING,
        response: outcome.into_result()?,
    }))
}

async fn run_interaction(
    state: &AppState,
    action: Action,
    document: Option<ResumeDocument>,
    job_description: &str,
) -> (Uuid, Outcome) {
    let interaction_id = Uuid::new_v4();
    let span = info_span!("interaction", id = %interaction_id, action = %action);

    let outcome = async {
        info!(
            "Running '{}' (resume uploaded: {}, job description: {} chars)",
            action.label(),
            document.is_some(),
            job_description.len()
        );
        state
            .controller
            .handle(action, document, job_description)
            .await
    }
    .instrument(span)
    .await;

    (interaction_id, outcome)
}
