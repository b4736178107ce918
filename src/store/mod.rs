//! Remote journal row storage.
//!
//! This module defines the journal row types and the HTTP client for the
//! hosted relational store. Rows live in the `journals` table; the store
//! assigns `created_at` at insert time and rows are never updated or deleted
//! afterwards.

use crate::constants::{ENTRIES_ORDER_DESC, JOURNALS_TABLE_PATH};
use crate::errors::{AppResult, StoreError};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentiment classification attached to every journal entry.
///
/// This is a closed set: a row never carries anything but one of these three
/// values, and `Neutral` doubles as the fallback when classification is
/// unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Returns the lowercase wire form of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A journal row as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Identity of the owning user.
    pub user_id: String,
    /// The user-authored entry text.
    pub entry_text: String,
    /// Sentiment classification assigned at capture time.
    pub sentiment_tag: SentimentLabel,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A journal row about to be inserted. The store assigns `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewJournalEntry {
    pub user_id: String,
    pub entry_text: String,
    pub sentiment_tag: SentimentLabel,
}

/// HTTP client for the journal row store.
///
/// Every request carries the public API key; the caller's bearer token is
/// attached per call so the backend can enforce row ownership.
pub struct EntryStore {
    base_url: String,
    api_key: String,
    client: Client,
}

impl EntryStore {
    /// Creates a new store client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the data backend, without a trailing slash
    /// * `api_key` - Public API key identifying this client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Inserts one journal row.
    ///
    /// # Arguments
    ///
    /// * `access_token` - Bearer token of the owning session
    /// * `entry` - The row to insert; `user_id` must match the session identity
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the store is unreachable or refuses the
    /// write (authorization failure, constraint violation).
    pub fn insert(&self, access_token: &str, entry: &NewJournalEntry) -> AppResult<()> {
        debug!("Inserting journal entry for user {}", entry.user_id);

        let url = format!("{}{}", self.base_url, JOURNALS_TABLE_PATH);
        // The row endpoint accepts a batch; a single capture always sends one.
        let rows = [entry];

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .map_err(StoreError::Unreachable)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = error_message(response.text().unwrap_or_default());
            return Err(StoreError::Rejected { status, message }.into());
        }

        debug!("Journal entry inserted");
        Ok(())
    }

    /// Lists all journal rows owned by `user_id`, most recent first.
    ///
    /// An empty list is a valid result, not an error.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the store is unreachable, refuses the read,
    /// or answers with a payload that is not a list of journal rows.
    pub fn list_by_user(&self, access_token: &str, user_id: &str) -> AppResult<Vec<JournalEntry>> {
        debug!("Listing journal entries for user {}", user_id);

        let url = format!("{}{}", self.base_url, JOURNALS_TABLE_PATH);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("order", ENTRIES_ORDER_DESC.to_string()),
            ])
            .send()
            .map_err(StoreError::Unreachable)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = error_message(response.text().unwrap_or_default());
            return Err(StoreError::Rejected { status, message }.into());
        }

        let entries: Vec<JournalEntry> = response.json().map_err(|e| {
            StoreError::InvalidResponse(format!("Failed to parse journal rows: {}", e))
        })?;

        debug!("Listed {} journal entries", entries.len());
        Ok(entries)
    }
}

/// Extracts a human-readable message from a store error body.
fn error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
