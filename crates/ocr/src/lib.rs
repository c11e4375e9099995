pub mod client;
pub mod prompt;
pub mod response;

pub use client::{ExtractError, OcrConfig, VisionClient};
pub use response::{content_to_text, extract_content, parse_json_content, resolve_mime};
