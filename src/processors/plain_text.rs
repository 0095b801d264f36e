use tracing::{info, warn};

use crate::error::ExtractError;
use crate::result::ProcessedResult;

pub const DECODE_ERROR: &str = "decode error";
pub const EMPTY_CONTENT: &str = "empty content";

/// Plain text processor: strict UTF-8 decode, no OCR fallback.
#[derive(Debug, Clone, Default)]
pub struct PlainTextProcessor;

impl PlainTextProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, bytes: &[u8]) -> Result<ProcessedResult, ExtractError> {
        info!("Starting TXT file processing");

        match decode(bytes) {
            Ok(text) => {
                info!("Text extracted successfully");
                ProcessedResult::extracted(text)
            }
            Err(e) => {
                warn!(error = %e, "Failed to extract text from TXT file");
                let reason = match &e {
                    ExtractError::Decode(_) => DECODE_ERROR,
                    _ => EMPTY_CONTENT,
                };
                ProcessedResult::failed(e.kind(), reason)
            }
        }
    }
}

fn decode(bytes: &[u8]) -> Result<&str, ExtractError> {
    let text = std::str::from_utf8(bytes)?;
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyContent);
    }
    Ok(text)
}
