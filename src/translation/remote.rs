//! The remote translation backend.
//!
//! Responses are decoded into explicit types; anything that does not match
//! the expected shape is a [`RemoteError::Malformed`] failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Why a remote call produced no usable answer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("failed to reach translation backend: {0}")]
    Transport(String),

    #[error("translation backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response from translation backend: {0}")]
    Malformed(String),

    #[error("translation backend did not answer within {0:?}")]
    Timeout(Duration),

    #[error("request was dropped before it was sent")]
    Cancelled,
}

/// Translation and language-detection calls against a remote service.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, RemoteError>;

    async fn is_german(&self, text: &str) -> Result<bool, RemoteError>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    from: &'a str,
    to: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    #[serde(rename = "isGerman")]
    is_german: bool,
}

/// Talks to `POST {endpoint}/api/translate` and `POST {endpoint}/api/is-german`.
pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, RemoteError> {
        let url = format!("{}{path}", self.endpoint);

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(format!("{url}: {e}")))?;

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl TranslationBackend for HttpBackend {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, RemoteError> {
        let body = self
            .post("/api/translate", &TranslateRequest { text, from, to })
            .await?;
        parse_translate_response(&body)
    }

    async fn is_german(&self, text: &str) -> Result<bool, RemoteError> {
        let body = self.post("/api/is-german", &DetectRequest { text }).await?;
        parse_detect_response(&body)
    }
}

fn parse_translate_response(body: &str) -> Result<String, RemoteError> {
    serde_json::from_str::<TranslateResponse>(body)
        .map(|r| r.translated_text)
        .map_err(|e| RemoteError::Malformed(e.to_string()))
}

fn parse_detect_response(body: &str) -> Result<bool, RemoteError> {
    serde_json::from_str::<DetectResponse>(body)
        .map(|r| r.is_german)
        .map_err(|e| RemoteError::Malformed(e.to_string()))
}
