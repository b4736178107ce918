//! HTTP client for the sentiment classification endpoint.
//!
//! This module sends entry text to a hosted generative-text endpoint and
//! reduces the natural-language reply to a [`SentimentLabel`]. Classification
//! is best-effort: callers are expected to fall back to
//! [`SentimentLabel::Neutral`] when this client returns an error.

use crate::constants::SENTIMENT_PROMPT_PREAMBLE;
use crate::errors::{AppResult, ClassifierError};
use crate::store::SentimentLabel;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request body for the classification endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Response from the classification endpoint. Every level may be missing in
/// a degraded reply, so the shape is defensive about absent fields.
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
    text: Option<String>,
}

/// Client for the sentiment classification endpoint.
pub struct SentimentClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl SentimentClient {
    /// Creates a new classifier client.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full URL of the text-generation endpoint
    /// * `api_key` - Key attached to every request as a query parameter
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Classifies the sentiment of `text`.
    ///
    /// Sends one request with no retries and the library's default timeout,
    /// then reduces the reply with [`label_from_response`].
    ///
    /// # Errors
    ///
    /// Returns a `ClassifierError` if the endpoint is unreachable, answers
    /// with a non-success status, or the payload carries no candidate text.
    /// Callers degrade any of these to `Neutral`; they never abort a save.
    pub fn classify(&self, text: &str) -> AppResult<SentimentLabel> {
        debug!("Requesting sentiment classification");

        let prompt = format!("{}\n\n\"{}\"", SENTIMENT_PROMPT_PREAMBLE, text);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .map_err(ClassifierError::Unreachable)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_default();
            return Err(ClassifierError::Endpoint { status, message }.into());
        }

        let payload: GenerateResponse = response.json().map_err(|e| {
            ClassifierError::MalformedResponse(format!(
                "Failed to parse classification response: {}",
                e
            ))
        })?;

        let raw = first_candidate_text(payload).ok_or_else(|| {
            ClassifierError::MalformedResponse("response carried no candidate text".to_string())
        })?;

        debug!("Classifier replied: {}", raw.trim());
        Ok(label_from_response(&raw))
    }
}

/// Pulls the first candidate's first text part out of a reply, if any.
fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}

/// Reduces a natural-language classifier reply to a label.
///
/// The check order is load-bearing: a reply mentioning both labels resolves
/// to `Positive` because that substring is checked first, and anything that
/// mentions neither resolves to `Neutral`. `Neutral` therefore covers both
/// genuine neutral replies and unparseable ones.
pub fn label_from_response(raw: &str) -> SentimentLabel {
    let lowered = raw.to_lowercase();
    if lowered.contains("positive") {
        SentimentLabel::Positive
    } else if lowered.contains("negative") {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
