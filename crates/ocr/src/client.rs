use base64::Engine;
use serde_json::{json, Value};
use thiserror::Error;

use crate::prompt::RECEIPT_PROMPT;
use crate::response::{extract_content, parse_json_content, resolve_mime};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:1234";
const DEFAULT_MODEL: &str = "nanonets-ocr2-3b";
const MAX_TOKENS: u32 = 1800;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Vision service error: {status} {body}")]
    Service { status: u16, body: String },
    #[error("Vision service unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Vision response is not valid JSON")]
    InvalidJson,
}

/// Connection settings for the vision endpoint, an OpenAI-compatible chat
/// completions server (LM Studio, llama.cpp and the like).
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), model: DEFAULT_MODEL.to_string() }
    }
}

impl OcrConfig {
    /// Read `PARAGON_OCR_URL` and `PARAGON_OCR_MODEL`, defaulting to a local
    /// LM Studio instance.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("PARAGON_OCR_URL").unwrap_or(defaults.base_url),
            model: std::env::var("PARAGON_OCR_MODEL").unwrap_or(defaults.model),
        }
    }
}

/// Client for receipt extraction through a vision model. Returns the model's
/// raw JSON verbatim; cleanup belongs to the normalizer, which treats every
/// field as untrusted.
pub struct VisionClient {
    config: OcrConfig,
    http: reqwest::Client,
}

impl VisionClient {
    pub fn new(config: OcrConfig) -> Self {
        Self { config, http: reqwest::Client::new() }
    }

    /// Submit an image (or PDF page) and get back the parsed JSON payload.
    pub async fn analyze_receipt(
        &self,
        bytes: &[u8],
        mime: Option<&str>,
    ) -> Result<Value, ExtractError> {
        let mime = resolve_mime(mime);
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let data_url = format!("data:{mime};base64,{encoded}");

        let body = json!({
            "model": self.config.model,
            "temperature": 0,
            "max_tokens": MAX_TOKENS,
            "messages": [
                { "role": "system", "content": RECEIPT_PROMPT },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "Analyze this receipt image and return JSON only." },
                        { "type": "image_url", "image_url": { "url": data_url } }
                    ]
                }
            ],
        });

        tracing::debug!(model = %self.config.model, bytes = bytes.len(), %mime,
            "submitting receipt for extraction");

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Service { status, body });
        }

        let payload: Value = response.json().await?;
        let content = extract_content(&payload).ok_or(ExtractError::InvalidJson)?;
        parse_json_content(&content)
    }
}
