use bytes::Bytes;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use tracing::{info, warn};

use crate::error::ExtractError;
use crate::result::ProcessedResult;

pub const PARSE_ERROR: &str = "parse error";
pub const EMPTY_CONTENT: &str = "empty content";

/// DOCX processor that joins body paragraph text in reading order.
///
/// Images embedded in the document are not OCR-processed, so an image-only
/// document is reported as empty content.
#[derive(Debug, Clone, Default)]
pub struct DocxProcessor;

impl DocxProcessor {
    pub fn new() -> Self {
        Self
    }

    pub async fn process(&self, bytes: Bytes) -> Result<ProcessedResult, ExtractError> {
        info!("Starting DOCX file processing");

        match extract(bytes).await {
            Ok(text) => {
                info!("Text extracted successfully");
                ProcessedResult::extracted(text)
            }
            Err(e) => {
                warn!(error = %e, "Failed to extract text from DOCX file");
                let reason = match &e {
                    ExtractError::EmptyContent => EMPTY_CONTENT,
                    _ => PARSE_ERROR,
                };
                ProcessedResult::failed(e.kind(), reason)
            }
        }
    }
}

async fn extract(bytes: Bytes) -> Result<String, ExtractError> {
    let paragraphs = tokio::task::spawn_blocking(move || read_paragraphs(&bytes)).await??;

    let text = paragraphs.join(" ");
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyContent);
    }
    Ok(text)
}

/// Text of every top-level body paragraph, empty ones included.
fn read_paragraphs(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| ExtractError::parse(format!("Failed to parse DOCX: {}", e)))?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect())
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_run_text(&para.children, &mut text);
    text
}

/// Append run text, descending into hyperlinks.
fn push_run_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_run_text(&link.children, text),
            _ => {}
        }
    }
}
