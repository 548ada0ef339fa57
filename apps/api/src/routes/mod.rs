pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_mb * 1024 * 1024);

    Router::new()
        .route("/health", get(health::health_handler))
        // Single-page tool
        .route("/", get(handlers::handle_index).post(handlers::handle_form))
        // Analysis API
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::controller::tests::StubConverter;
    use crate::analysis::controller::InteractionController;
    use crate::analysis::dispatcher::tests::StubGenerator;
    use crate::analysis::dispatcher::InferenceDispatcher;
    use crate::analysis::prompts::MATCH_PERCENTAGE_PROMPT;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "----ats-xpert-test-boundary";

    enum Field<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(fields: &[Field]) -> Vec<u8> {
        let mut body = Vec::new();
        for field in fields {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match field {
                Field::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Field::File(name, filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/pdf\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post(uri: &str, fields: &[Field]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields)))
            .unwrap()
    }

    fn test_config() -> Config {
        Config {
            google_api_key: "test-key".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_api_base: "http://127.0.0.1:1".to_string(),
            llm_timeout_secs: 5,
            verify_model_on_startup: false,
            pdftoppm_path: "pdftoppm".to_string(),
            pdf_render_dpi: 200,
            jpeg_quality: 75,
            max_upload_mb: 1,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app(converter: Arc<StubConverter>, generator: Arc<StubGenerator>) -> Router {
        let controller = InteractionController::new(converter, InferenceDispatcher::new(generator));
        build_router(AppState {
            controller: Arc::new(controller),
            config: test_config(),
        })
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    const PDF: &[u8] = b"%PDF-1.4\n%%EOF\n";

    #[tokio::test]
    async fn test_health() {
        let app = app(Arc::new(StubConverter::ok()), Arc::new(StubGenerator::replying("")));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let app = app(Arc::new(StubConverter::ok()), Arc::new(StubGenerator::replying("")));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("ATS Tracking System"));
        assert!(html.contains(r#"name="action" value="match_percentage""#));
    }

    #[tokio::test]
    async fn test_api_success_returns_model_text() {
        let converter = Arc::new(StubConverter::ok());
        let generator = Arc::new(StubGenerator::replying("Match: 72%"));
        let response = app(converter.clone(), generator.clone())
            .oneshot(post(
                "/api/v1/analyze",
                &[
                    Field::Text("job_description", "Platform engineer, Kubernetes"),
                    Field::File("resume", "cv.pdf", PDF),
                    Field::Text("action", "match_percentage"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["response"], "Match: 72%");
        assert_eq!(json["heading"], "The response is:");
        assert_eq!(json["action"], "match_percentage");
        assert!(json["interaction_id"].is_string());

        let seen = generator.seen.lock().unwrap();
        assert!(seen[0].0[0].contains("Platform engineer, Kubernetes"));
        assert!(seen[0].0[0].contains(MATCH_PERCENTAGE_PROMPT));
    }

    #[tokio::test]
    async fn test_api_without_file_asks_for_upload() {
        let converter = Arc::new(StubConverter::ok());
        let generator = Arc::new(StubGenerator::replying("unused"));
        let response = app(converter.clone(), generator.clone())
            .oneshot(post(
                "/api/v1/analyze",
                &[Field::Text("action", "match_percentage")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["error"]["message"], "Please upload the file.");
        assert_eq!(converter.call_count(), 0);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_api_treats_empty_file_part_as_missing() {
        let generator = Arc::new(StubGenerator::replying("unused"));
        let response = app(Arc::new(StubConverter::ok()), generator.clone())
            .oneshot(post(
                "/api/v1/analyze",
                &[
                    Field::File("resume", "", b""),
                    Field::Text("action", "overview"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_api_conversion_failure_is_422() {
        let generator = Arc::new(StubGenerator::replying("unused"));
        let response = app(Arc::new(StubConverter::failing("bad xref")), generator.clone())
            .oneshot(post(
                "/api/v1/analyze",
                &[
                    Field::File("resume", "cv.pdf", PDF),
                    Field::Text("action", "skill_gap"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Error processing PDF: "));
        assert!(message.contains("bad xref"));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_api_generation_failure_is_502() {
        let response = app(
            Arc::new(StubConverter::ok()),
            Arc::new(StubGenerator::failing("timeout")),
        )
        .oneshot(post(
            "/api/v1/analyze",
            &[
                Field::File("resume", "cv.pdf", PDF),
                Field::Text("action", "overview"),
            ],
        ))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["error"]["code"], "LLM_ERROR");
        assert!(json["error"]["message"].as_str().unwrap().contains("timeout"));
        assert!(json.get("response").is_none());
    }

    #[tokio::test]
    async fn test_api_requires_action() {
        let response = app(Arc::new(StubConverter::ok()), Arc::new(StubGenerator::replying("")))
            .oneshot(post(
                "/api/v1/analyze",
                &[Field::File("resume", "cv.pdf", PDF)],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_rejects_unknown_action() {
        let response = app(Arc::new(StubConverter::ok()), Arc::new(StubGenerator::replying("")))
            .oneshot(post("/api/v1/analyze", &[Field::Text("action", "rewrite")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("unknown action 'rewrite'"));
    }

    #[tokio::test]
    async fn test_api_applies_action_precedence() {
        let generator = Arc::new(StubGenerator::replying("ok"));
        let response = app(Arc::new(StubConverter::ok()), generator.clone())
            .oneshot(post(
                "/api/v1/analyze",
                &[
                    Field::File("resume", "cv.pdf", PDF),
                    Field::Text("action", "match_percentage"),
                    Field::Text("action", "skill_gap"),
                ],
            ))
            .await
            .unwrap();

        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["action"], "skill_gap");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_form_post_renders_response_under_heading() {
        let response = app(
            Arc::new(StubConverter::ok()),
            Arc::new(StubGenerator::replying("Candidate has 5 years experience...")),
        )
        .oneshot(post(
            "/",
            &[
                Field::Text("job_description", "Senior backend engineer"),
                Field::File("resume", "cv.pdf", PDF),
                Field::Text("action", "overview"),
            ],
        ))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<h2>The response is:</h2>"));
        assert!(html.contains("Candidate has 5 years experience..."));
        assert!(html.contains(">Senior backend engineer</textarea>"));
    }

    #[tokio::test]
    async fn test_form_post_without_file_shows_message() {
        let response = app(Arc::new(StubConverter::ok()), Arc::new(StubGenerator::replying("")))
            .oneshot(post("/", &[Field::Text("action", "match_percentage")]))
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("Please upload the file."));
        assert!(!html.contains("The response is:"));
    }

    #[tokio::test]
    async fn test_form_post_without_action_is_idle() {
        let generator = Arc::new(StubGenerator::replying("unused"));
        let response = app(Arc::new(StubConverter::ok()), generator.clone())
            .oneshot(post(
                "/",
                &[
                    Field::Text("job_description", "Data analyst"),
                    Field::File("resume", "cv.pdf", PDF),
                ],
            ))
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains(">Data analyst</textarea>"));
        assert!(!html.contains("class=\"message\""));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_body_limit_rejects_oversized_upload() {
        let oversized = vec![b'a'; 2 * 1024 * 1024];
        let response = app(Arc::new(StubConverter::ok()), Arc::new(StubGenerator::replying("")))
            .oneshot(post(
                "/api/v1/analyze",
                &[
                    Field::File("resume", "cv.pdf", &oversized),
                    Field::Text("action", "overview"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
    }
}
