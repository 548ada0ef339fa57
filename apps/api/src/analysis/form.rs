use axum::extract::Multipart;

use crate::analysis::prompts::Action;
use crate::errors::AppError;
use crate::models::ResumeDocument;

/// Parsed fields of the analysis form.
#[derive(Debug, Default)]
pub struct AnalysisForm {
    pub job_description: String,
    pub document: Option<ResumeDocument>,
    pub actions: Vec<Action>,
}

impl AnalysisForm {
    /// The one action to run, if any was triggered.
    pub fn action(&self) -> Option<Action> {
        Action::resolve(&self.actions)
    }
}

/// Reads `job_description`, `resume` and repeated `action` fields.
/// Unknown fields are skipped. A file field with no bytes counts as no upload,
/// which is what browsers send when the file input is left empty.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "job_description" => {
                form.job_description = field.text().await?;
            }
            "resume" => {
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let document = ResumeDocument::new(filename, field.bytes().await?);
                // An empty file input counts as no upload.
                if !document.is_empty() {
                    form.document = Some(document);
                }
            }
            "action" => {
                let value = field.text().await?;
                let action = value
                    .parse::<Action>()
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                if !form.actions.contains(&action) {
                    form.actions.push(action);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}
