//! Integration tests for the entry capture pipeline.
//!
//! These tests verify the full submit workflow (validate, classify, persist,
//! refresh) against mocked auth, store, and classifier backends.

use mockito::{Matcher, Server, ServerGuard};
use moodlog::auth::{AuthClient, SessionProvider};
use moodlog::classifier::SentimentClient;
use moodlog::errors::{AppError, JournalError, StoreError};
use moodlog::journal::JournalService;
use moodlog::store::EntryStore;
use moodlog::SentimentLabel;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Token response body for a successful sign-in.
fn token_body() -> String {
    json!({
        "access_token": "token-1",
        "user": {"id": "user-1", "email": "a@example.com"}
    })
    .to_string()
}

/// Classifier response body whose candidate text is `reply`.
fn classifier_body(reply: &str) -> String {
    json!({
        "candidates": [{"content": {"parts": [{"text": reply}]}}]
    })
    .to_string()
}

/// A journal row as the store would return it.
fn row(text: &str, tag: &str, created_at: &str) -> serde_json::Value {
    json!({
        "user_id": "user-1",
        "entry_text": text,
        "sentiment_tag": tag,
        "created_at": created_at
    })
}

/// Builds a provider and pipeline wired against `backend` and the given
/// classifier endpoint, with the session cache in `dir`.
fn harness(
    backend: &ServerGuard,
    classifier_url: &str,
    dir: &TempDir,
) -> (Arc<SessionProvider>, JournalService) {
    let sessions = Arc::new(SessionProvider::new(
        AuthClient::new(backend.url(), "anon-key"),
        dir.path().join("session.json"),
    ));
    let journal = JournalService::new(
        Arc::clone(&sessions),
        EntryStore::new(backend.url(), "anon-key"),
        SentimentClient::new(classifier_url, "classifier-key"),
    );
    (sessions, journal)
}

/// Signs the harness in against a one-shot token mock.
fn sign_in(backend: &mut ServerGuard, sessions: &SessionProvider) {
    let mock = backend
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(token_body())
        .create();

    sessions
        .sign_in("a@example.com", "password")
        .expect("sign in against mock backend");
    mock.assert();
}

#[test]
fn test_submit_persists_classified_entry_and_refreshes() {
    let mut backend = Server::new();
    let mut classifier = Server::new();
    let dir = TempDir::new().expect("create temp dir");

    let (sessions, journal) = harness(&backend, &classifier.url(), &dir);
    sign_in(&mut backend, &sessions);

    let classify = classifier
        .mock("POST", "/")
        .match_query(Matcher::UrlEncoded("key".into(), "classifier-key".into()))
        .with_status(200)
        .with_body(classifier_body("Positive"))
        .create();

    let insert = backend
        .mock("POST", "/rest/v1/journals")
        .match_header("apikey", "anon-key")
        .match_header("authorization", "Bearer token-1")
        .match_body(Matcher::Json(json!([{
            "user_id": "user-1",
            "entry_text": "Great day at the beach",
            "sentiment_tag": "positive"
        }])))
        .with_status(201)
        .create();

    let list = backend
        .mock("GET", "/rest/v1/journals")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_id".into(), "eq.user-1".into()),
            Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([row(
                "Great day at the beach",
                "positive",
                "2025-07-21T10:00:00+00:00"
            )])
            .to_string(),
        )
        .create();

    journal
        .submit("Great day at the beach")
        .expect("submit should succeed");

    classify.assert();
    insert.assert();
    list.assert();

    let entries = journal.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_text, "Great day at the beach");
    assert_eq!(entries[0].sentiment_tag, SentimentLabel::Positive);
}

/// A failing classifier endpoint must not block the save: the entry goes in
/// tagged neutral.
#[test]
fn test_classifier_server_error_degrades_to_neutral_and_persists() {
    let mut backend = Server::new();
    let mut classifier = Server::new();
    let dir = TempDir::new().expect("create temp dir");

    let (sessions, journal) = harness(&backend, &classifier.url(), &dir);
    sign_in(&mut backend, &sessions);

    let classify = classifier
        .mock("POST", "/")
        .with_status(503)
        .with_body("overloaded")
        .create();

    let insert = backend
        .mock("POST", "/rest/v1/journals")
        .match_body(Matcher::Json(json!([{
            "user_id": "user-1",
            "entry_text": "who knows",
            "sentiment_tag": "neutral"
        }])))
        .with_status(201)
        .create();

    let _list = backend
        .mock("GET", "/rest/v1/journals")
        .with_status(200)
        .with_body(json!([row("who knows", "neutral", "2025-07-21T10:00:00+00:00")]).to_string())
        .create();

    journal.submit("who knows").expect("submit should succeed");

    classify.assert();
    insert.assert();
    assert_eq!(journal.entries()[0].sentiment_tag, SentimentLabel::Neutral);
}

/// Same fail-safe when the classifier endpoint is not reachable at all.
#[test]
fn test_unreachable_classifier_degrades_to_neutral_and_persists() {
    let mut backend = Server::new();
    let dir = TempDir::new().expect("create temp dir");

    // Nothing listens on port 9.
    let (sessions, journal) = harness(&backend, "http://127.0.0.1:9", &dir);
    sign_in(&mut backend, &sessions);

    let insert = backend
        .mock("POST", "/rest/v1/journals")
        .match_body(Matcher::Regex("\"sentiment_tag\":\"neutral\"".to_string()))
        .with_status(201)
        .create();

    let _list = backend
        .mock("GET", "/rest/v1/journals")
        .with_status(200)
        .with_body(json!([row("offline day", "neutral", "2025-07-21T10:00:00+00:00")]).to_string())
        .create();

    journal.submit("offline day").expect("submit should succeed");
    insert.assert();
}

/// Empty and whitespace-only submissions make no remote call at all.
#[test]
fn test_empty_submission_makes_no_remote_calls() {
    let mut backend = Server::new();
    let mut classifier = Server::new();
    let dir = TempDir::new().expect("create temp dir");

    let (sessions, journal) = harness(&backend, &classifier.url(), &dir);
    sign_in(&mut backend, &sessions);

    let classify = classifier.mock("POST", "/").expect(0).create();
    let insert = backend.mock("POST", "/rest/v1/journals").expect(0).create();

    match journal.submit("   \n") {
        Err(AppError::Journal(JournalError::EmptyEntry)) => {}
        other => panic!("Expected EmptyEntry, got {:?}", other),
    }

    classify.assert();
    insert.assert();
    assert!(journal.entries().is_empty());
}

/// Without a live session nothing is classified and nothing is stored.
#[test]
fn test_submit_without_session_makes_no_remote_calls() {
    let mut backend = Server::new();
    let mut classifier = Server::new();
    let dir = TempDir::new().expect("create temp dir");

    let (_sessions, journal) = harness(&backend, &classifier.url(), &dir);

    let classify = classifier.mock("POST", "/").expect(0).create();
    let insert = backend.mock("POST", "/rest/v1/journals").expect(0).create();

    match journal.submit("nobody home") {
        Err(AppError::Journal(JournalError::NotSignedIn)) => {}
        other => panic!("Expected NotSignedIn, got {:?}", other),
    }

    classify.assert();
    insert.assert();
}

/// A rejected insert surfaces as a store error and leaves the previously
/// listed entries untouched.
#[test]
fn test_rejected_insert_surfaces_error_and_keeps_list() {
    let mut backend = Server::new();
    let mut classifier = Server::new();
    let dir = TempDir::new().expect("create temp dir");

    let (sessions, journal) = harness(&backend, &classifier.url(), &dir);
    sign_in(&mut backend, &sessions);

    let list = backend
        .mock("GET", "/rest/v1/journals")
        .with_status(200)
        .with_body(json!([row("older entry", "neutral", "2025-07-20T08:00:00+00:00")]).to_string())
        .expect(1)
        .create();
    journal.refresh().expect("initial refresh");
    list.assert();

    let _classify = classifier
        .mock("POST", "/")
        .with_status(200)
        .with_body(classifier_body("negative"))
        .create();

    let _insert = backend
        .mock("POST", "/rest/v1/journals")
        .with_status(401)
        .with_body(json!({"message": "JWT expired"}).to_string())
        .create();

    match journal.submit("new entry") {
        Err(AppError::Store(StoreError::Rejected {
            status: 401,
            message,
        })) => {
            assert!(message.contains("JWT expired"));
        }
        other => panic!("Expected rejected store error, got {:?}", other),
    }

    // The failed submission never re-listed, so the old snapshot stands.
    let entries = journal.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_text, "older entry");
}

/// The list request asks for reverse chronological order and the snapshot
/// preserves it: after saving E1, E2, E3 the list reads [E3, E2, E1].
#[test]
fn test_entries_are_listed_most_recent_first() {
    let mut backend = Server::new();
    let dir = TempDir::new().expect("create temp dir");

    let (sessions, journal) = harness(&backend, "http://127.0.0.1:9", &dir);
    sign_in(&mut backend, &sessions);

    let list = backend
        .mock("GET", "/rest/v1/journals")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_id".into(), "eq.user-1".into()),
            Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([
                row("E3", "positive", "2025-07-21T12:00:00+00:00"),
                row("E2", "neutral", "2025-07-21T11:00:00+00:00"),
                row("E1", "negative", "2025-07-21T10:00:00+00:00"),
            ])
            .to_string(),
        )
        .create();

    journal.refresh().expect("refresh");
    list.assert();

    let texts: Vec<_> = journal
        .entries()
        .iter()
        .map(|e| e.entry_text.clone())
        .collect();
    assert_eq!(texts, vec!["E3", "E2", "E1"]);
}

/// List subscribers see every wholesale replacement.
#[test]
fn test_list_subscribers_are_notified_on_refresh() {
    let mut backend = Server::new();
    let dir = TempDir::new().expect("create temp dir");

    let (sessions, journal) = harness(&backend, "http://127.0.0.1:9", &dir);
    sign_in(&mut backend, &sessions);

    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_listener = Arc::clone(&seen);
    journal.subscribe(move |entries| {
        seen_in_listener.store(entries.len(), Ordering::SeqCst);
    });

    let _list = backend
        .mock("GET", "/rest/v1/journals")
        .with_status(200)
        .with_body(
            json!([
                row("E2", "neutral", "2025-07-21T11:00:00+00:00"),
                row("E1", "neutral", "2025-07-21T10:00:00+00:00"),
            ])
            .to_string(),
        )
        .create();

    journal.refresh().expect("refresh");
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}
