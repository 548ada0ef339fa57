use anyhow::{bail, Context, Result};
use std::str::FromStr;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Startup fails if the API credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub llm_timeout_secs: u64,
    pub verify_model_on_startup: bool,
    pub pdftoppm_path: String,
    pub pdf_render_dpi: u32,
    pub jpeg_quality: u8,
    pub max_upload_mb: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let google_api_key = check_api_key(require_env("GOOGLE_API_KEY")?)?;

        let jpeg_quality: u8 = parse_env("JPEG_QUALITY", 75)?;
        if !(1..=100).contains(&jpeg_quality) {
            bail!("JPEG_QUALITY must be between 1 and 100, got {jpeg_quality}");
        }

        Ok(Config {
            google_api_key,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            verify_model_on_startup: parse_env("VERIFY_MODEL_ON_STARTUP", true)?,
            pdftoppm_path: std::env::var("PDFTOPPM_PATH")
                .unwrap_or_else(|_| "pdftoppm".to_string()),
            pdf_render_dpi: parse_env("PDF_RENDER_DPI", 200)?,
            jpeg_quality,
            max_upload_mb: parse_env("MAX_UPLOAD_MB", 200)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn check_api_key(key: String) -> Result<String> {
    if key.trim().is_empty() {
        bail!("Required environment variable 'GOOGLE_API_KEY' is empty");
    }
    Ok(key)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value '{raw}'"))
}
