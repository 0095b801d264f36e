//! Service configuration.
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file by `dotenvy` in `main`). Parsing goes through a lookup function so it
//! can be exercised without touching the real environment.

use anyhow::{anyhow, Context, Result};
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_MAX_UPLOAD_MB: usize = 100;
const DEFAULT_OCR_API_VERSION: &str = "2023-07-31";
const DEFAULT_OCR_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_OCR_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    pub ocr: OcrConfig,
}

/// Connection and polling settings for the remote OCR service.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub poll_interval: Duration,
    /// Upper bound on one OCR call, upload and polling together.
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "EXTRACTOR_BIND_ADDR", || {
            SocketAddr::from(([0, 0, 0, 0], 8000))
        })?;
        let max_upload_mb: usize =
            parse_or(&lookup, "EXTRACTOR_MAX_UPLOAD_MB", || DEFAULT_MAX_UPLOAD_MB)?;

        let ocr = OcrConfig {
            endpoint: required(&lookup, "AZURE_OCR_ENDPOINT")?,
            api_key: required(&lookup, "AZURE_OCR_SECRET_KEY")?,
            api_version: lookup("AZURE_OCR_API_VERSION")
                .unwrap_or_else(|| DEFAULT_OCR_API_VERSION.to_string()),
            poll_interval: Duration::from_millis(parse_or(
                &lookup,
                "AZURE_OCR_POLL_INTERVAL_MS",
                || DEFAULT_OCR_POLL_INTERVAL_MS,
            )?),
            timeout: Duration::from_secs(parse_or(&lookup, "AZURE_OCR_TIMEOUT_SECS", || {
                DEFAULT_OCR_TIMEOUT_SECS
            })?),
        };

        Ok(Self {
            bind_addr,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            ocr,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("{} environment variable not set", key))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: impl FnOnce() -> T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("AZURE_OCR_ENDPOINT", "https://ocr.example.com"),
            ("AZURE_OCR_SECRET_KEY", "key"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8000");
        assert_eq!(config.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(config.ocr.api_version, "2023-07-31");
        assert_eq!(config.ocr.poll_interval, Duration::from_millis(1000));
        assert_eq!(config.ocr.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("EXTRACTOR_BIND_ADDR", "127.0.0.1:9000"),
            ("EXTRACTOR_MAX_UPLOAD_MB", "5"),
            ("AZURE_OCR_ENDPOINT", "https://ocr.example.com"),
            ("AZURE_OCR_SECRET_KEY", "key"),
            ("AZURE_OCR_POLL_INTERVAL_MS", "250"),
            ("AZURE_OCR_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.ocr.poll_interval, Duration::from_millis(250));
        assert_eq!(config.ocr.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(
            "AZURE_OCR_ENDPOINT",
            "https://ocr.example.com",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("AZURE_OCR_SECRET_KEY"));
    }

    #[test]
    fn test_invalid_number_names_variable() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("AZURE_OCR_ENDPOINT", "https://ocr.example.com"),
            ("AZURE_OCR_SECRET_KEY", "key"),
            ("AZURE_OCR_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("AZURE_OCR_TIMEOUT_SECS"));
    }
}
