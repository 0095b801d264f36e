//! OCR provider abstraction.
//!
//! Defines the [`OcrProvider`] trait the PDF processor falls back to when a
//! document has no native text layer. Providers keep their failure modes
//! distinct through [`OcrError`] so callers can log them; the processor itself
//! treats every variant as one extraction failure.

pub mod azure;

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OCR authentication rejected ({status})")]
    Authentication { status: u16 },

    #[error("OCR service rejected the document ({status}): {message}")]
    InvalidInput { status: u16, message: String },

    #[error("OCR service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("OCR operation failed: {0}")]
    OperationFailed(String),

    #[error("OCR operation did not finish within {0:?}")]
    Timeout(Duration),

    #[error("malformed OCR response: {0}")]
    MalformedResponse(String),
}

impl OcrError {
    /// Map a non-success HTTP status from the OCR service to an error variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Authentication { status },
            400 | 413 | 415 => Self::InvalidInput { status, message },
            _ => Self::Service { status, message },
        }
    }

    /// Short label used as a structured log field.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Authentication { .. } => "authentication",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Service { .. } => "service",
            Self::OperationFailed(_) => "operation_failed",
            Self::Timeout(_) => "timeout",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Async trait implemented by each OCR backend.
#[async_trait::async_trait]
pub trait OcrProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Recognize text in `document`, returning lines in reading order.
    /// An empty vector means the service found no text.
    async fn analyze(&self, document: Bytes) -> Result<Vec<String>, OcrError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            OcrError::from_status(401, String::new()),
            OcrError::Authentication { status: 401 }
        ));
        assert!(matches!(
            OcrError::from_status(403, String::new()),
            OcrError::Authentication { status: 403 }
        ));
        assert!(matches!(
            OcrError::from_status(415, "bad".into()),
            OcrError::InvalidInput { status: 415, .. }
        ));
        assert!(matches!(
            OcrError::from_status(503, "busy".into()),
            OcrError::Service { status: 503, .. }
        ));
    }

    #[test]
    fn test_labels_are_distinct() {
        let errors = [
            OcrError::Authentication { status: 401 },
            OcrError::InvalidInput {
                status: 400,
                message: String::new(),
            },
            OcrError::Service {
                status: 500,
                message: String::new(),
            },
            OcrError::OperationFailed(String::new()),
            OcrError::Timeout(Duration::from_secs(1)),
            OcrError::MalformedResponse(String::new()),
        ];
        let mut labels: Vec<_> = errors.iter().map(OcrError::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), errors.len());
    }
}
