//! Format processors and the closed set of content types routed to them.

pub mod docx;
pub mod pdf;
pub mod plain_text;

pub use docx::DocxProcessor;
pub use pdf::PdfProcessor;
pub use plain_text::PlainTextProcessor;

/// Supported upload formats, keyed by their exact MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl ContentFormat {
    pub const ALL: [ContentFormat; 3] = [Self::Pdf, Self::Docx, Self::PlainText];

    /// Exact match against the registered MIME strings; no parameter or case folding.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.mime_type() == content_type)
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::PlainText => "text/plain",
        }
    }
}
