/*!
# Moodlog - Journaling with Sentiment Tagging

Moodlog is a command-line journaling client. Entries are written against a
hosted backend: each save classifies the text through a sentiment endpoint,
persists the row, and refreshes the local view of the list.

This file contains the main application flow, coordinating the various
components to implement the journal functionality.

## Usage

```
moodlog [OPTIONS] <COMMAND>

Commands:
  sign-up   Create an account and sign in
  sign-in   Sign in with an existing account
  sign-out  Sign out and clear the cached session
  write     Save a journal entry (reads stdin when TEXT is omitted)
  list      List saved entries, most recent first

Options:
  -v, --verbose  Print verbose output
  -h, --help     Print help information
  -V, --version  Print version information
```

## Configuration

The application is configured with the following environment variables:
- `MOODLOG_BACKEND_URL` and `MOODLOG_API_KEY`: the auth/store backend
- `MOODLOG_CLASSIFIER_URL` and `MOODLOG_CLASSIFIER_KEY`: the sentiment endpoint
- `MOODLOG_SESSION_FILE`: session cache path (defaults to ~/.config/moodlog/session.json)
*/

use clap::Parser;
use moodlog::auth::{AuthClient, SessionProvider};
use moodlog::classifier::SentimentClient;
use moodlog::cli::{CliArgs, Command};
use moodlog::config::Config;
use moodlog::constants::{DEFAULT_LOG_FILTER, LIST_TIMESTAMP_FORMAT, VERBOSE_LOG_FILTER};
use moodlog::errors::AppResult;
use moodlog::journal::JournalService;
use moodlog::store::EntryStore;
use std::io::Read;
use std::process;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the verbose flag picks between the
/// default and debug filters. Logs go to stderr so command output stays
/// clean on stdout.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Coordinates the overall application flow:
/// 1. Loads and validates configuration
/// 2. Wires the session provider and the capture pipeline
/// 3. Dispatches the requested command
fn run(args: CliArgs) -> AppResult<()> {
    info!("Starting moodlog");

    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let sessions = Arc::new(SessionProvider::new(
        AuthClient::new(config.backend_url.as_str(), config.api_key.as_str()),
        config.session_file.clone(),
    ));
    let journal = JournalService::new(
        Arc::clone(&sessions),
        EntryStore::new(config.backend_url.as_str(), config.api_key.as_str()),
        SentimentClient::new(
            config.classifier_url.as_str(),
            config.classifier_key.as_str(),
        ),
    );

    match args.command {
        Command::SignUp { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            let session = sessions.sign_up(&email, &password)?;
            println!("Signed up and signed in as {}", session.email);
        }
        Command::SignIn { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            let session = sessions.sign_in(&email, &password)?;
            println!("Signed in as {}", session.email);
        }
        Command::SignOut => {
            sessions.sign_out()?;
            println!("Signed out.");
        }
        Command::Write { text } => {
            sessions.restore_session();
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            journal.submit(&text)?;

            // The refreshed list leads with the entry just saved.
            match journal.entries().first() {
                Some(entry) => println!("Entry saved, tagged {}.", entry.sentiment_tag),
                None => println!("Entry saved."),
            }
        }
        Command::List => {
            sessions.restore_session();
            journal.refresh()?;

            let entries = journal.entries();
            if entries.is_empty() {
                println!("No entries yet.");
            }
            for entry in entries {
                let local = entry.created_at.with_timezone(&chrono::Local);
                println!(
                    "[{}] ({}) {}",
                    local.format(LIST_TIMESTAMP_FORMAT),
                    entry.sentiment_tag,
                    entry.entry_text
                );
            }
        }
    }

    Ok(())
}

fn read_stdin() -> AppResult<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
