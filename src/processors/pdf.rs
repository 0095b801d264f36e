use std::sync::Arc;

use bytes::Bytes;
use lopdf::Document;
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::ocr::OcrProvider;
use crate::result::ProcessedResult;

pub const EXTRACTION_FAILED: &str = "failed to extract text";

/// PDF processor with a two-tier strategy.
///
/// Page 1 is probed for a native text layer. If it has one, every page is
/// read natively; otherwise the whole document is sent to the OCR provider.
/// Only the first page is probed, so a document whose first page is scanned
/// goes to OCR even if later pages carry text.
pub struct PdfProcessor {
    ocr: Arc<dyn OcrProvider>,
}

/// What the native pass found.
#[derive(Debug, PartialEq, Eq)]
enum TextLayer {
    Native(String),
    Absent,
}

impl PdfProcessor {
    pub fn new(ocr: Arc<dyn OcrProvider>) -> Self {
        Self { ocr }
    }

    pub async fn process(&self, bytes: Bytes) -> Result<ProcessedResult, ExtractError> {
        info!("Starting PDF file processing");

        match self.extract(bytes).await {
            Ok(text) => {
                info!("Text extracted successfully");
                ProcessedResult::extracted(text)
            }
            Err(e) => {
                match &e {
                    ExtractError::Ocr(ocr_err) => warn!(
                        provider = self.ocr.name(),
                        ocr_error = ocr_err.label(),
                        error = %ocr_err,
                        "OCR text extraction failed"
                    ),
                    _ => warn!(error = %e, "Failed to extract text from PDF file"),
                }
                ProcessedResult::failed(e.kind(), EXTRACTION_FAILED)
            }
        }
    }

    async fn extract(&self, bytes: Bytes) -> Result<String, ExtractError> {
        let native_input = bytes.clone();
        let layer = tokio::task::spawn_blocking(move || read_text_layer(&native_input)).await??;

        match layer {
            TextLayer::Native(text) => {
                info!("First page has a text layer, used native text extraction");
                Ok(text)
            }
            TextLayer::Absent => {
                info!(
                    provider = self.ocr.name(),
                    "No text found on the first page, using OCR text extraction"
                );
                let lines = self.ocr.analyze(bytes).await?;
                join_ocr_lines(lines)
            }
        }
    }
}

/// Probe page 1, then read every page natively if the probe found text.
fn read_text_layer(bytes: &[u8]) -> Result<TextLayer, ExtractError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ExtractError::parse(format!("Failed to load PDF: {}", e)))?;

    let pages = doc.get_pages();
    let Some(&first_page) = pages.keys().next() else {
        debug!("PDF has no pages");
        return Ok(TextLayer::Absent);
    };

    let probe = doc.extract_text(&[first_page]).unwrap_or_else(|e| {
        debug!(error = %e, "Could not read text layer of the first page");
        String::new()
    });
    if probe.trim().is_empty() {
        return Ok(TextLayer::Absent);
    }

    let mut text = String::new();
    for page_number in pages.keys() {
        let page_text = doc
            .extract_text(&[*page_number])
            .map_err(|e| ExtractError::parse(format!("page {}: {}", page_number, e)))?;
        text.push(' ');
        text.push_str(&page_text);
    }

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyContent);
    }
    debug!(pages = pages.len(), chars = text.len(), "Read native text layer");
    Ok(TextLayer::Native(text))
}

fn join_ocr_lines(lines: Vec<String>) -> Result<String, ExtractError> {
    let text = lines.join(" ");
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyContent);
    }
    Ok(text)
}
