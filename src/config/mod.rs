//! Configuration management for the moodlog application.
//!
//! This module handles loading and validating configuration settings from
//! environment variables. The backend URL and the two API keys have no
//! defaults on purpose: the application talks to hosted services and refuses
//! to guess where they live or how to authenticate against them.
//!
//! # Environment Variables
//!
//! - `MOODLOG_BACKEND_URL`: Base URL of the auth and journal store backend (required)
//! - `MOODLOG_API_KEY`: Public API key sent to the auth and store endpoints (required)
//! - `MOODLOG_CLASSIFIER_URL`: Sentiment classifier endpoint (defaults to the hosted endpoint)
//! - `MOODLOG_CLASSIFIER_KEY`: API key for the classifier endpoint (required)
//! - `MOODLOG_SESSION_FILE`: Session cache path (defaults to ~/.config/moodlog/session.json)

use crate::constants::{
    DEFAULT_CLASSIFIER_URL, DEFAULT_SESSION_FILE, ENV_VAR_API_KEY, ENV_VAR_BACKEND_URL,
    ENV_VAR_CLASSIFIER_KEY, ENV_VAR_CLASSIFIER_URL, ENV_VAR_SESSION_FILE, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the moodlog application.
///
/// Holds the endpoints and credentials for the three remote collaborators
/// (auth backend, journal store, sentiment classifier) and the location of
/// the local session cache.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use moodlog::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     backend_url: "https://project.example.co".to_string(),
///     api_key: "public-anon-key".to_string(),
///     classifier_url: "https://classifier.example.com/v1/generate".to_string(),
///     classifier_key: "classifier-key".to_string(),
///     session_file: PathBuf::from("/tmp/session.json"),
/// };
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Base URL of the backend serving both authentication and journal rows.
    pub backend_url: String,

    /// Public API key identifying this client to the backend.
    pub api_key: String,

    /// URL of the sentiment classification endpoint.
    pub classifier_url: String,

    /// API key for the sentiment classification endpoint.
    pub classifier_key: String,

    /// Path of the file the current session is cached in between runs.
    pub session_file: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend_url", &self.backend_url)
            .field("api_key", &REDACTED_PLACEHOLDER)
            .field("classifier_url", &self.classifier_url)
            .field("classifier_key", &REDACTED_PLACEHOLDER)
            .field("session_file", &self.session_file)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Required variables produce a configuration error naming the missing
    /// variable; optional ones fall back to their documented defaults. The
    /// session file path is tilde-expanded.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required environment variable is
    /// missing.
    pub fn load() -> AppResult<Self> {
        let backend_url = require_env(ENV_VAR_BACKEND_URL)?;
        let api_key = require_env(ENV_VAR_API_KEY)?;
        let classifier_url = env::var(ENV_VAR_CLASSIFIER_URL)
            .unwrap_or_else(|_| DEFAULT_CLASSIFIER_URL.to_string());
        let classifier_key = require_env(ENV_VAR_CLASSIFIER_KEY)?;

        let session_file =
            env::var(ENV_VAR_SESSION_FILE).unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string());
        let session_file = PathBuf::from(shellexpand::tilde(&session_file).into_owned());

        Ok(Config {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            api_key,
            classifier_url: classifier_url.trim_end_matches('/').to_string(),
            classifier_key,
            session_file,
        })
    }

    /// Validates the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a URL does not use http(s) or a key is
    /// empty.
    pub fn validate(&self) -> AppResult<()> {
        validate_url(ENV_VAR_BACKEND_URL, &self.backend_url)?;
        validate_url(ENV_VAR_CLASSIFIER_URL, &self.classifier_url)?;

        if self.api_key.is_empty() {
            return Err(AppError::Config(format!(
                "{} must not be empty",
                ENV_VAR_API_KEY
            )));
        }
        if self.classifier_key.is_empty() {
            return Err(AppError::Config(format!(
                "{} must not be empty",
                ENV_VAR_CLASSIFIER_KEY
            )));
        }

        Ok(())
    }
}

/// Reads a required environment variable, rejecting unset and empty values.
fn require_env(name: &str) -> AppResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Config(format!(
            "{} is not set. Export it before running moodlog.",
            name
        ))),
    }
}

fn validate_url(name: &str, url: &str) -> AppResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "{} must be an http(s) URL, got '{}'",
            name, url
        )))
    }
}
