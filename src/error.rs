//! Error taxonomy for the extraction pipeline.
//!
//! Processors recover every variant except `ContractViolation` and `Task`
//! into a failed [`ProcessedResult`](crate::result::ProcessedResult). Those two
//! are defects and surface through the dispatcher's last-resort catch.

use thiserror::Error;

use crate::ocr::OcrError;
use crate::result::FailureKind;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing file bytes")]
    MissingInput,

    #[error("unsupported file type")]
    UnsupportedFormat(String),

    #[error("decode error: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("empty content")]
    EmptyContent,

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("result contract violated: {0}")]
    ContractViolation(&'static str),

    #[error("processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ExtractError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Classification carried by a failed result built from this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingInput => FailureKind::MissingInput,
            Self::UnsupportedFormat(_) => FailureKind::UnsupportedFormat,
            Self::Decode(_) => FailureKind::Decode,
            Self::Parse(_) => FailureKind::Parse,
            Self::EmptyContent => FailureKind::EmptyContent,
            Self::Ocr(_) => FailureKind::Ocr,
            Self::ContractViolation(_) | Self::Task(_) => FailureKind::Internal,
        }
    }
}
