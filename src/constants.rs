//! Constants used throughout the application.
//!
//! This module contains all constants used in the moodlog application,
//! organized into logical groups. Having constants centralized makes them
//! easier to find, modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "moodlog";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A journaling client with sentiment tagging";

// Configuration Keys & Environment Variables
/// Environment variable for the backend base URL (auth and journal store).
pub const ENV_VAR_BACKEND_URL: &str = "MOODLOG_BACKEND_URL";
/// Environment variable for the backend public API key.
pub const ENV_VAR_API_KEY: &str = "MOODLOG_API_KEY";
/// Environment variable for the sentiment classifier endpoint URL.
pub const ENV_VAR_CLASSIFIER_URL: &str = "MOODLOG_CLASSIFIER_URL";
/// Environment variable for the sentiment classifier API key.
pub const ENV_VAR_CLASSIFIER_KEY: &str = "MOODLOG_CLASSIFIER_KEY";
/// Environment variable overriding the session cache file path.
pub const ENV_VAR_SESSION_FILE: &str = "MOODLOG_SESSION_FILE";
/// Default path of the session cache file, tilde-expanded at load time.
pub const DEFAULT_SESSION_FILE: &str = "~/.config/moodlog/session.json";
/// Default sentiment classifier endpoint.
pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Authentication Endpoints
/// Path for the sign-up endpoint on the auth backend.
pub const AUTH_SIGNUP_PATH: &str = "/auth/v1/signup";
/// Path for the password-grant token endpoint on the auth backend.
pub const AUTH_TOKEN_PATH: &str = "/auth/v1/token";
/// Path for the logout endpoint on the auth backend.
pub const AUTH_LOGOUT_PATH: &str = "/auth/v1/logout";
/// Path for the current-user endpoint, used to validate a cached token.
pub const AUTH_USER_PATH: &str = "/auth/v1/user";

// Journal Store
/// Path of the journals table on the data backend.
pub const JOURNALS_TABLE_PATH: &str = "/rest/v1/journals";
/// Ordering expression for listing entries, most recent first.
pub const ENTRIES_ORDER_DESC: &str = "created_at.desc";

// Sentiment Classification
/// Instruction sent ahead of the entry text when requesting a classification.
pub const SENTIMENT_PROMPT_PREAMBLE: &str = "Classify the sentiment of the following journal \
     entry as one of: \"positive\", \"neutral\", or \"negative\". Respond with only the \
     sentiment tag.";

// Logging Configuration
/// Default log filter when RUST_LOG is not set.
pub const DEFAULT_LOG_FILTER: &str = "moodlog=info";
/// Log filter applied when the verbose flag is set.
pub const VERBOSE_LOG_FILTER: &str = "moodlog=debug";

// Date/Time Logic
/// Format used when rendering entry timestamps in the list output.
pub const LIST_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
