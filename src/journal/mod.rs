//! Entry capture pipeline.
//!
//! One submission runs validate -> classify -> persist -> refresh, in that
//! order, each step completing before the next begins. Classification is the
//! only step that cannot fail a submission: any classifier error degrades to
//! the neutral label. A persistence failure aborts the pipeline before the
//! in-memory list is touched, so the caller keeps the unsaved text.
//!
//! The in-memory entry list is owned here. It is only ever replaced
//! wholesale with the store's answer, never merged or optimistically
//! updated.

use crate::auth::{Session, SessionProvider};
use crate::classifier::SentimentClient;
use crate::errors::{AppResult, JournalError};
use crate::store::{EntryStore, JournalEntry, NewJournalEntry, SentimentLabel};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

type EntryListener = Box<dyn Fn(&[JournalEntry]) + Send + Sync>;

/// Releases the in-flight flag when a submission ends, on every exit path.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates entry capture and owns the in-memory entry list.
pub struct JournalService {
    sessions: Arc<SessionProvider>,
    store: EntryStore,
    classifier: SentimentClient,
    entries: RwLock<Vec<JournalEntry>>,
    listeners: RwLock<Vec<EntryListener>>,
    in_flight: AtomicBool,
}

impl JournalService {
    /// Creates a pipeline over the given collaborators, with an empty list.
    pub fn new(
        sessions: Arc<SessionProvider>,
        store: EntryStore,
        classifier: SentimentClient,
    ) -> Self {
        Self {
            sessions,
            store,
            classifier,
            entries: RwLock::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Captures one journal entry.
    ///
    /// Rejects overlapping submissions, empty text, and the absence of a
    /// live session before any remote call is made. Classification failures
    /// degrade to [`SentimentLabel::Neutral`] and never block the save.
    ///
    /// # Errors
    ///
    /// Returns a `JournalError` on validation failure and a `StoreError` when
    /// the insert or the follow-up list fails. In both cases the in-memory
    /// list keeps its previous contents.
    pub fn submit(&self, raw_text: &str) -> AppResult<()> {
        let _guard = self.begin_submission()?;

        if raw_text.trim().is_empty() {
            return Err(JournalError::EmptyEntry.into());
        }
        let session = self
            .sessions
            .current_session()
            .ok_or(JournalError::NotSignedIn)?;

        let sentiment_tag = match self.classifier.classify(raw_text) {
            Ok(label) => label,
            Err(e) => {
                warn!("Sentiment classification failed, tagging neutral: {}", e);
                SentimentLabel::Neutral
            }
        };

        let entry = NewJournalEntry {
            user_id: session.user_id.clone(),
            entry_text: raw_text.to_string(),
            sentiment_tag,
        };
        self.store.insert(&session.access_token, &entry)?;
        info!("Saved journal entry tagged {}", sentiment_tag);

        self.refresh_for(&session)
    }

    /// Reloads the entry list for the current session.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::NotSignedIn` without a live session, or the
    /// store's error when listing fails.
    pub fn refresh(&self) -> AppResult<()> {
        let session = self
            .sessions
            .current_session()
            .ok_or(JournalError::NotSignedIn)?;
        self.refresh_for(&session)
    }

    /// Returns a snapshot of the entry list, most recent first.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.read().unwrap().clone()
    }

    /// Registers a callback invoked with the new list after every refresh.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&[JournalEntry]) + Send + Sync + 'static,
    {
        self.listeners.write().unwrap().push(Box::new(listener));
    }

    fn begin_submission(&self) -> AppResult<SubmissionGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(JournalError::SubmitInFlight.into());
        }
        Ok(SubmissionGuard {
            flag: &self.in_flight,
        })
    }

    fn refresh_for(&self, session: &Session) -> AppResult<()> {
        let listed = self
            .store
            .list_by_user(&session.access_token, &session.user_id)?;
        *self.entries.write().unwrap() = listed.clone();

        let listeners = self.listeners.read().unwrap();
        for listener in listeners.iter() {
            listener(&listed);
        }
        Ok(())
    }
}
