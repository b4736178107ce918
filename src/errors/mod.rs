//! Error handling utilities for the moodlog application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use thiserror::Error;

/// Represents specific error cases that can occur when talking to the
/// authentication backend.
///
/// These errors are surfaced verbatim to the user, so each message carries
/// enough context to act on.
///
/// # Examples
///
/// ```
/// use moodlog::errors::AuthError;
///
/// let error = AuthError::Rejected {
///     status: 400,
///     message: "Invalid login credentials".to_string(),
/// };
/// assert!(format!("{}", error).contains("Invalid login credentials"));
/// ```
#[derive(Debug, Error)]
pub enum AuthError {
    /// The authentication backend could not be reached.
    #[error("Authentication service unreachable: {0}. Check MOODLOG_BACKEND_URL and your network connection.")]
    Unreachable(#[source] reqwest::Error),

    /// The authentication backend refused the request.
    #[error("Authentication failed (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code returned by the backend
        status: u16,
        /// Message extracted from the backend's error body
        message: String,
    },

    /// The authentication backend answered with a payload that could not be
    /// interpreted.
    #[error("Invalid response from authentication service: {0}")]
    InvalidResponse(String),
}

/// Represents specific error cases that can occur when reading or writing
/// journal rows in the remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The journal store could not be reached.
    #[error("Journal store unreachable: {0}. Check MOODLOG_BACKEND_URL and your network connection.")]
    Unreachable(#[source] reqwest::Error),

    /// The journal store refused the request. Covers authorization failures
    /// and constraint violations alike.
    #[error("Journal store rejected the request (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code returned by the store
        status: u16,
        /// Message extracted from the store's error body
        message: String,
    },

    /// The journal store answered with a payload that could not be
    /// interpreted as journal rows.
    #[error("Invalid response from journal store: {0}")]
    InvalidResponse(String),
}

/// Represents specific error cases that can occur when requesting a sentiment
/// classification.
///
/// None of these reach the user from a submission: the capture pipeline
/// absorbs them and falls back to the neutral label.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The classification endpoint could not be reached.
    #[error("Sentiment endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The classification endpoint returned a non-success status.
    #[error("Sentiment endpoint returned HTTP {status}: {message}")]
    Endpoint {
        /// HTTP status code returned by the endpoint
        status: u16,
        /// Response body, or a placeholder when unreadable
        message: String,
    },

    /// The classification endpoint answered with a payload that carried no
    /// usable text.
    #[error("Unusable response from sentiment endpoint: {0}")]
    MalformedResponse(String),
}

/// Validation failures raised by the entry capture pipeline before any remote
/// call is made.
///
/// # Examples
///
/// ```
/// use moodlog::errors::JournalError;
///
/// let error = JournalError::EmptyEntry;
/// assert!(format!("{}", error).contains("empty"));
/// ```
#[derive(Debug, Error)]
pub enum JournalError {
    /// The submitted text was empty or whitespace-only.
    #[error("Entry is empty. Write something before saving.")]
    EmptyEntry,

    /// No live session exists, so the entry cannot be attributed to a user.
    #[error("Not signed in. Run 'moodlog sign-in <email>' first.")]
    NotSignedIn,

    /// A previous submission is still running.
    #[error("Another entry is still being saved. Wait for it to finish before saving again.")]
    SubmitInFlight,
}

/// Represents all possible errors that can occur in the moodlog application.
///
/// This enum is the central error type used across the application, with
/// variants for different error categories. It uses `thiserror` for deriving
/// the `Error` trait implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use moodlog::errors::AppError;
///
/// let error = AppError::Config("MOODLOG_BACKEND_URL is not set".to_string());
/// assert_eq!(
///     format!("{}", error),
///     "Configuration error: MOODLOG_BACKEND_URL is not set"
/// );
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors, e.g. from reading the session cache file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors from the authentication backend.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Errors from the journal store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Errors from the sentiment classification endpoint.
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Validation errors from the entry capture pipeline.
    #[error("{0}")]
    Journal(#[from] JournalError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use moodlog::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("missing value".to_string()));
///     }
///     Ok("value".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
