//! Result contract shared by every format processor.
//!
//! A successful result always carries non-empty text and a failed one always
//! carries a non-empty reason. Both payloads are [`NonEmptyText`], which can
//! only be built through a validating constructor.

use crate::error::ExtractError;

pub const STATUS_OK: u16 = 200;
pub const STATUS_UNPROCESSABLE: u16 = 422;

/// Why a processor could not produce text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingInput,
    UnsupportedFormat,
    Decode,
    Parse,
    EmptyContent,
    Ocr,
    Internal,
}

/// A string guaranteed to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Outcome of a single format processor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedResult {
    Extracted {
        text: NonEmptyText,
        status_code: u16,
    },
    Failed {
        kind: FailureKind,
        reason: NonEmptyText,
        status_code: u16,
    },
}

impl ProcessedResult {
    /// Successful result. Empty text is a processor defect.
    pub fn extracted(text: impl Into<String>) -> Result<Self, ExtractError> {
        let text = NonEmptyText::new(text).ok_or(ExtractError::ContractViolation(
            "text is required when processing succeeds",
        ))?;
        Ok(Self::Extracted {
            text,
            status_code: STATUS_OK,
        })
    }

    /// Failed result. An empty reason is a processor defect.
    pub fn failed(kind: FailureKind, reason: impl Into<String>) -> Result<Self, ExtractError> {
        let reason = NonEmptyText::new(reason).ok_or(ExtractError::ContractViolation(
            "reason is required when processing fails",
        ))?;
        Ok(Self::Failed {
            kind,
            reason,
            status_code: STATUS_UNPROCESSABLE,
        })
    }

    pub fn processed(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Extracted { status_code, .. } | Self::Failed { status_code, .. } => *status_code,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason, .. } => Some(reason.as_str()),
            Self::Extracted { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            Self::Extracted { .. } => None,
        }
    }
}

#[cfg(test)]
impl ProcessedResult {
    pub(crate) fn text(&self) -> Option<&str> {
        match self {
            Self::Extracted { text, .. } => Some(text.as_str()),
            Self::Failed { .. } => None,
        }
    }
}
