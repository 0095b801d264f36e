//! Azure AI Document Intelligence OCR provider (prebuilt `read` model).
//!
//! The service is a long-running operation: the document is submitted, the
//! returned `Operation-Location` is polled until it settles, and the lines of
//! every page are collected from the final result.

use std::time::Duration;

use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, info};

use super::{OcrError, OcrProvider};
use crate::config::OcrConfig;

const MODEL_ID: &str = "prebuilt-read";
const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

pub struct AzureReadProvider {
    endpoint: String,
    api_key: String,
    api_version: String,
    poll_interval: Duration,
    timeout: Duration,
    client: reqwest::Client,
}

impl AzureReadProvider {
    pub fn new(config: &OcrConfig, client: reqwest::Client) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
            poll_interval: config.poll_interval,
            timeout: config.timeout,
            client,
        }
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
            self.endpoint, MODEL_ID, self.api_version
        )
    }

    /// Submit the document, return the operation URL to poll.
    async fn submit(&self, document: Bytes) -> Result<String, OcrError> {
        info!(
            "AzureReadProvider: submitting {} bytes for analysis",
            document.len()
        );

        let resp = self
            .client
            .post(self.analyze_url())
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(document)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(OcrError::from_status(status.as_u16(), text));
        }

        let operation_url = resp
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                OcrError::MalformedResponse(format!(
                    "{} header missing from {} response",
                    OPERATION_LOCATION_HEADER, status
                ))
            })?;

        debug!("AzureReadProvider: operation accepted at {}", operation_url);
        Ok(operation_url)
    }

    /// Poll the operation until it succeeds or fails.
    async fn poll(&self, operation_url: &str) -> Result<AnalyzeResult, OcrError> {
        loop {
            let resp = self
                .client
                .get(operation_url)
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                return Err(OcrError::from_status(status.as_u16(), text));
            }

            let raw = resp.text().await?;
            let operation: AnalyzeOperation = serde_json::from_str(&raw)
                .map_err(|e| OcrError::MalformedResponse(e.to_string()))?;

            match operation.status.as_str() {
                "succeeded" => {
                    info!("AzureReadProvider: analysis succeeded");
                    return operation.analyze_result.ok_or_else(|| {
                        OcrError::MalformedResponse("succeeded without analyzeResult".to_string())
                    });
                }
                "failed" => {
                    let message = operation
                        .error
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| "no error details".to_string());
                    return Err(OcrError::OperationFailed(message));
                }
                other => {
                    debug!("AzureReadProvider: operation is {}... waiting", other);
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait::async_trait]
impl OcrProvider for AzureReadProvider {
    fn name(&self) -> &str {
        "azure_read"
    }

    async fn analyze(&self, document: Bytes) -> Result<Vec<String>, OcrError> {
        let result = tokio::time::timeout(self.timeout, async {
            let operation_url = self.submit(document).await?;
            self.poll(&operation_url).await
        })
        .await
        .map_err(|_| OcrError::Timeout(self.timeout))??;

        let lines = collect_lines(result);
        info!("AzureReadProvider: recognized {} lines", lines.len());
        Ok(lines)
    }
}

// ── Azure API response types ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    pages: Vec<AnalyzedPage>,
}

#[derive(Debug, Deserialize)]
struct AnalyzedPage {
    #[serde(default)]
    lines: Vec<AnalyzedLine>,
}

#[derive(Debug, Deserialize)]
struct AnalyzedLine {
    content: String,
}

/// Flatten page lines in page order, then line order.
fn collect_lines(result: AnalyzeResult) -> Vec<String> {
    result
        .pages
        .into_iter()
        .flat_map(|page| page.lines.into_iter().map(|line| line.content))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(endpoint: &str) -> AzureReadProvider {
        provider_with_timeout(endpoint, Duration::from_secs(1))
    }

    fn provider_with_timeout(endpoint: &str, timeout: Duration) -> AzureReadProvider {
        let config = OcrConfig {
            endpoint: endpoint.to_string(),
            api_key: "secret".to_string(),
            api_version: "2023-07-31".to_string(),
            poll_interval: Duration::from_millis(10),
            timeout,
        };
        AzureReadProvider::new(&config, reqwest::Client::new())
    }

    #[test]
    fn test_analyze_url() {
        let p = provider("https://example.cognitiveservices.azure.com/");
        assert_eq!(
            p.analyze_url(),
            "https://example.cognitiveservices.azure.com/formrecognizer/documentModels/prebuilt-read:analyze?api-version=2023-07-31"
        );
    }

    #[test]
    fn test_collect_lines_in_page_order() {
        let raw = r#"{
            "status": "succeeded",
            "analyzeResult": {
                "apiVersion": "2023-07-31",
                "pages": [
                    {"pageNumber": 1, "lines": [{"content": "Line one"}, {"content": "Line two"}]},
                    {"pageNumber": 2, "lines": []},
                    {"pageNumber": 3, "lines": [{"content": "Line three"}]}
                ]
            }
        }"#;
        let operation: AnalyzeOperation = serde_json::from_str(raw).unwrap();
        assert_eq!(operation.status, "succeeded");

        let lines = collect_lines(operation.analyze_result.unwrap());
        assert_eq!(lines, vec!["Line one", "Line two", "Line three"]);
    }

    #[test]
    fn test_no_text_is_empty_not_error() {
        let raw = r#"{"status": "succeeded", "analyzeResult": {"pages": [{"pageNumber": 1}]}}"#;
        let operation: AnalyzeOperation = serde_json::from_str(raw).unwrap();
        assert!(collect_lines(operation.analyze_result.unwrap()).is_empty());
    }

    #[test]
    fn test_failed_operation_payload() {
        let raw = r#"{"status": "failed", "error": {"code": "InvalidContent", "message": "Corrupted file"}}"#;
        let operation: AnalyzeOperation = serde_json::from_str(raw).unwrap();
        let error = operation.error.unwrap();
        assert_eq!(error.code, "InvalidContent");
        assert_eq!(error.message, "Corrupted file");
        assert!(operation.analyze_result.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let p = provider("http://127.0.0.1:9");
        let err = p.analyze(Bytes::from_static(b"%PDF-1.5")).await.unwrap_err();
        assert!(matches!(err, OcrError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_stalled_submit_times_out() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let timeout = Duration::from_millis(200);
        let p = provider_with_timeout(&format!("http://{}", addr), timeout);
        let err = p.analyze(Bytes::from_static(b"%PDF-1.5")).await.unwrap_err();
        assert!(matches!(err, OcrError::Timeout(t) if t == timeout), "got {err:?}");
    }
}
