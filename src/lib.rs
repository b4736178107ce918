/*!
# Moodlog

Moodlog is a journaling client with sentiment tagging. Users authenticate
against a hosted backend, write free-text journal entries, and each entry is
tagged with a sentiment classification ("positive", "neutral", "negative")
obtained from a text-classification endpoint, then persisted remotely and
listed most recent first.

## Core Features

- Sign up, sign in, and sign out against a hosted auth backend, with the
  session cached locally between runs
- Save journal entries; each save classifies the text and persists the row
  with its sentiment tag
- List saved entries in reverse chronological order
- Classification is best-effort: when the classifier is unavailable the entry
  is saved with the neutral tag instead of failing

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure
- `auth`: Session lifecycle against the auth backend
- `store`: Journal row types and the remote store client
- `classifier`: Sentiment classification client
- `journal`: The entry capture pipeline tying the above together

## Usage Example

```rust,no_run
use moodlog::auth::{AuthClient, SessionProvider};
use moodlog::classifier::SentimentClient;
use moodlog::journal::JournalService;
use moodlog::store::EntryStore;
use moodlog::Config;
use std::sync::Arc;

fn main() -> moodlog::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let sessions = Arc::new(SessionProvider::new(
        AuthClient::new(config.backend_url.as_str(), config.api_key.as_str()),
        config.session_file.clone(),
    ));
    let journal = JournalService::new(
        Arc::clone(&sessions),
        EntryStore::new(config.backend_url.as_str(), config.api_key.as_str()),
        SentimentClient::new(config.classifier_url.as_str(), config.classifier_key.as_str()),
    );

    sessions.restore_session();
    journal.submit("Finally finished the move. Exhausted but relieved.")?;
    Ok(())
}
```
*/

/// Session lifecycle and the authentication backend client
pub mod auth;
/// Sentiment classification client
pub mod classifier;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Constants used throughout the application
pub mod constants;
/// Error types and utilities for error handling
pub mod errors;
/// The entry capture pipeline
pub mod journal;
/// Journal row types and the remote store client
pub mod store;

// Re-export important types for convenience
pub use auth::{Session, SessionProvider};
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use journal::JournalService;
pub use store::{JournalEntry, SentimentLabel};
