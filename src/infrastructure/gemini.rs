//! Gemini `generateContent` client

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::infrastructure::traits::{LanguageModel, ModelError};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Blocking client for the Gemini REST API.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Self {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().unwrap_or_else(|e| {
            debug!("falling back to default HTTP client: {}", e);
            reqwest::blocking::Client::new()
        });
        Self {
            http,
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
            model: settings.model.clone(),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl LanguageModel for GeminiClient {
    #[instrument(level = "debug", skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let key = self.api_key.as_deref().ok_or(ModelError::MissingApiKey)?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        // The key travels as a header; request errors are reported without their URL.
        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, key)
            .json(&request)
            .send()
            .map_err(|e| ModelError::Request(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ModelError::Request(e.without_url().to_string()))?;
        debug!("model answered with status {} ({} bytes)", status, body.len());

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ModelError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ModelError::EmptyAnswer);
        }
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
