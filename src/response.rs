//! Outcome assembly and the wire shape returned to HTTP clients.

use serde::{Deserialize, Serialize};

use crate::result::ProcessedResult;

/// Metadata echoed back for the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileInfo {
    pub filename: String,
    pub content_type: String,
    /// Extracted text; empty on failure.
    pub content: String,
}

/// Result of one `extract` call, built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub success: bool,
    pub http_status: u16,
    /// Empty on success.
    pub reason: String,
    pub file: FileInfo,
}

impl ExtractionOutcome {
    /// Wrap a processor result together with the request metadata.
    pub fn from_result(filename: &str, content_type: &str, result: ProcessedResult) -> Self {
        let http_status = result.status_code();
        let (success, reason, content) = match result {
            ProcessedResult::Extracted { text, .. } => (true, String::new(), text.into_string()),
            ProcessedResult::Failed { reason, .. } => (false, reason.into_string(), String::new()),
        };

        Self {
            success,
            http_status,
            reason,
            file: FileInfo {
                filename: filename.to_string(),
                content_type: content_type.to_string(),
                content,
            },
        }
    }

    /// A failure decided before or around processing (preconditions, defects).
    pub fn rejected(
        http_status: u16,
        reason: impl Into<String>,
        filename: &str,
        content_type: &str,
    ) -> Self {
        Self {
            success: false,
            http_status,
            reason: reason.into(),
            file: FileInfo {
                filename: filename.to_string(),
                content_type: content_type.to_string(),
                content: String::new(),
            },
        }
    }
}

/// REST DTO for the uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

/// REST DTO for the extraction response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContentExtractionResponse {
    pub success: bool,
    pub reason: String,
    pub file: FileResponse,
}

impl From<ExtractionOutcome> for FileContentExtractionResponse {
    fn from(outcome: ExtractionOutcome) -> Self {
        let ExtractionOutcome {
            success,
            reason,
            file,
            ..
        } = outcome;

        Self {
            success,
            reason: if success { String::new() } else { reason },
            file: FileResponse {
                filename: file.filename,
                content_type: file.content_type,
                content: if success { file.content } else { String::new() },
            },
        }
    }
}
