//! Client for the OCR.space `parse/image` endpoint.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::OcrConfig;

const OCR_LANGUAGE: &str = "eng";
const OCR_ENGINE: &str = "2";

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("OCR provider returned HTTP {0}")]
    Status(StatusCode),

    #[error("OCR provider reported a processing error: {0}")]
    Provider(String),

    #[error("OCR response could not be decoded: {0}")]
    Malformed(#[source] reqwest::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrResponse {
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<serde_json::Value>,
    #[serde(default)]
    parsed_results: Option<Vec<ParsedResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: Option<String>,
}

#[derive(Clone)]
pub struct OcrClient {
    client: Client,
    endpoint: String,
}

impl OcrClient {
    pub fn new(config: &OcrConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run OCR over a PDF and return the trimmed text of all parsed results.
    ///
    /// Exactly one request is made; nothing is retried.
    pub async fn recognize(&self, pdf: &[u8], api_key: &str) -> Result<String, OcrError> {
        let file = Part::bytes(pdf.to_vec())
            .file_name("file.pdf")
            .mime_str("application/pdf")
            .map_err(OcrError::Transport)?;
        let form = Form::new()
            .text("language", OCR_LANGUAGE)
            .text("isOverlayRequired", "false")
            .text("OCREngine", OCR_ENGINE)
            .part("file", file);

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", api_key)
            .multipart(form)
            .send()
            .await
            .map_err(OcrError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrError::Status(status));
        }

        let body: OcrResponse = response.json().await.map_err(OcrError::Malformed)?;
        if body.is_errored_on_processing {
            return Err(OcrError::Provider(describe_provider_error(
                body.error_message.as_ref(),
            )));
        }

        let text = body
            .parsed_results
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.parsed_text.unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text.trim().to_string())
    }

    /// OCR for the upload path: any failure is logged and becomes `""`.
    pub async fn recognize_lossy(&self, pdf: &[u8], api_key: &str) -> String {
        match self.recognize(pdf, api_key).await {
            Ok(text) => {
                debug!(text_len = text.chars().count(), "OCR completed");
                text
            }
            Err(e) => {
                warn!(error = %e, "OCR failed, keeping native text");
                String::new()
            }
        }
    }
}

/// The provider reports `ErrorMessage` either as a string or a list of strings.
fn describe_provider_error(message: Option<&serde_json::Value>) -> String {
    match message {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        _ => "unknown error".to_string(),
    }
}
