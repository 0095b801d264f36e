//! Extraction dispatcher: precondition checks, format routing and last-resort
//! error normalization.

use std::sync::Arc;

use bytes::Bytes;
use tokio_util::task::AbortOnDropHandle;
use tracing::{error, info, instrument};

use crate::error::ExtractError;
use crate::ocr::OcrProvider;
use crate::processors::{ContentFormat, DocxProcessor, PdfProcessor, PlainTextProcessor};
use crate::response::ExtractionOutcome;
use crate::result::ProcessedResult;

const STATUS_BAD_REQUEST: u16 = 400;
// Empty uploads are reported as a server error; kept for compatibility with existing clients.
const STATUS_MISSING_BYTES: u16 = 500;
const STATUS_INTERNAL: u16 = 500;

/// Routes uploads to the processor for their content type.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct FileContentExtractor {
    processors: Arc<Processors>,
}

struct Processors {
    plain_text: PlainTextProcessor,
    docx: DocxProcessor,
    pdf: PdfProcessor,
}

impl Processors {
    async fn run(
        &self,
        format: ContentFormat,
        bytes: Bytes,
    ) -> Result<ProcessedResult, ExtractError> {
        match format {
            ContentFormat::Pdf => self.pdf.process(bytes).await,
            ContentFormat::Docx => self.docx.process(bytes).await,
            ContentFormat::PlainText => self.plain_text.process(&bytes),
        }
    }
}

impl FileContentExtractor {
    pub fn new(ocr: Arc<dyn OcrProvider>) -> Self {
        Self {
            processors: Arc::new(Processors {
                plain_text: PlainTextProcessor::new(),
                docx: DocxProcessor::new(),
                pdf: PdfProcessor::new(ocr),
            }),
        }
    }

    /// Extract text from an uploaded file. Always returns a well-formed outcome.
    #[instrument(
        name = "extractor.extract",
        skip(self, bytes),
        fields(filename = %filename, content_type = %content_type, size = bytes.len())
    )]
    pub async fn extract(
        &self,
        filename: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> ExtractionOutcome {
        if bytes.is_empty() {
            info!("Missed file bytes");
            let err = ExtractError::MissingInput;
            return ExtractionOutcome::rejected(
                STATUS_MISSING_BYTES,
                err.to_string(),
                filename,
                content_type,
            );
        }

        let Some(format) = ContentFormat::from_content_type(content_type) else {
            let err = ExtractError::UnsupportedFormat(content_type.to_string());
            info!(error = ?err, "Unsupported content type");
            return ExtractionOutcome::rejected(
                STATUS_BAD_REQUEST,
                err.to_string(),
                filename,
                content_type,
            );
        };

        // Own task per request so a panicking processor is reported, not propagated.
        // Aborted if the caller stops waiting.
        let processors = Arc::clone(&self.processors);
        let task = AbortOnDropHandle::new(tokio::spawn(async move {
            processors.run(format, bytes).await
        }));

        let result = match task.await.map_err(ExtractError::from) {
            Ok(Ok(result)) => result,
            Ok(Err(e)) | Err(e) => {
                error!(error = %e, "Unexpected error during file processing");
                return ExtractionOutcome::rejected(
                    STATUS_INTERNAL,
                    e.to_string(),
                    filename,
                    content_type,
                );
            }
        };

        info!(
            success = result.processed(),
            kind = ?result.failure_kind(),
            reason = result.reason(),
            "File processed"
        );
        ExtractionOutcome::from_result(filename, content_type, result)
    }
}
