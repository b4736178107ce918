//! Session management against the hosted authentication backend.
//!
//! This module owns the live [`Session`]: it is created by sign-in or
//! sign-up, restored from a local cache file at startup, and destroyed by
//! sign-out. Every other component receives read-only clones through
//! [`SessionProvider::current_session`] and can watch for changes through
//! [`SessionProvider::subscribe`]. Nothing outside this module mutates
//! session state.

use crate::constants::{AUTH_LOGOUT_PATH, AUTH_SIGNUP_PATH, AUTH_TOKEN_PATH, AUTH_USER_PATH};
use crate::errors::{AppResult, AuthError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// One authenticated identity.
///
/// At most one session is live per process. The access token is a secret and
/// is kept out of `Debug` output.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user identifier assigned by the auth backend.
    pub user_id: String,
    /// Email the session was created with. Informational only.
    pub email: String,
    /// Bearer token attached to store requests on this session's behalf.
    pub access_token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Sign-in / sign-up request body.
#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Successful sign-in / sign-up response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserPayload,
}

/// User object as returned by the auth backend.
#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    email: Option<String>,
}

/// HTTP client for the authentication backend.
pub struct AuthClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl AuthClient {
    /// Creates a new auth client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the auth backend, without a trailing slash
    /// * `api_key` - Public API key identifying this client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    fn sign_up(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        debug!("Signing up {}", email);
        let url = format!("{}{}", self.base_url, AUTH_SIGNUP_PATH);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&CredentialsRequest { email, password })
            .send()
            .map_err(AuthError::Unreachable)?;
        token_response(response)
    }

    fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        debug!("Signing in {}", email);
        let url = format!("{}{}", self.base_url, AUTH_TOKEN_PATH);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .query(&[("grant_type", "password")])
            .json(&CredentialsRequest { email, password })
            .send()
            .map_err(AuthError::Unreachable)?;
        token_response(response)
    }

    fn sign_out(&self, access_token: &str) -> AppResult<()> {
        debug!("Signing out");
        let url = format!("{}{}", self.base_url, AUTH_LOGOUT_PATH);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .map_err(AuthError::Unreachable)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = error_message(response.text().unwrap_or_default());
            return Err(AuthError::Rejected { status, message }.into());
        }
        Ok(())
    }

    /// Validates a bearer token by fetching the user it belongs to.
    fn current_user(&self, access_token: &str) -> AppResult<UserPayload> {
        debug!("Validating cached token");
        let url = format!("{}{}", self.base_url, AUTH_USER_PATH);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .map_err(AuthError::Unreachable)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = error_message(response.text().unwrap_or_default());
            return Err(AuthError::Rejected { status, message }.into());
        }

        let user: UserPayload = response.json().map_err(|e| {
            AuthError::InvalidResponse(format!("Failed to parse user response: {}", e))
        })?;
        Ok(user)
    }
}

fn token_response(response: reqwest::blocking::Response) -> AppResult<TokenResponse> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let message = error_message(response.text().unwrap_or_default());
        return Err(AuthError::Rejected { status, message }.into());
    }

    let token: TokenResponse = response.json().map_err(|e| {
        AuthError::InvalidResponse(format!("Failed to parse token response: {}", e))
    })?;
    Ok(token)
}

/// Extracts a human-readable message from an auth error body.
fn error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error_description")
                .or_else(|| v.get("msg"))
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

type SessionListener = Box<dyn Fn(Option<&Session>) + Send + Sync>;

/// Owner of the process-wide session state.
///
/// Holds the current session behind a lock, persists it to a cache file
/// between runs, and notifies subscribers on every transition.
pub struct SessionProvider {
    client: AuthClient,
    cache_path: PathBuf,
    state: RwLock<Option<Session>>,
    listeners: RwLock<Vec<SessionListener>>,
}

impl SessionProvider {
    /// Creates a provider with no live session.
    ///
    /// # Arguments
    ///
    /// * `client` - Auth backend client
    /// * `cache_path` - File the session is cached in between runs
    pub fn new(client: AuthClient, cache_path: PathBuf) -> Self {
        Self {
            client,
            cache_path,
            state: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Returns a clone of the current session, if one is live.
    pub fn current_session(&self) -> Option<Session> {
        self.state.read().unwrap().clone()
    }

    /// Registers a callback invoked with the new state on every session
    /// transition.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        self.listeners.write().unwrap().push(Box::new(listener));
    }

    /// Restores a previously cached session, if it is still valid.
    ///
    /// Invoked once at startup. Any failure along the way (missing cache
    /// file, malformed JSON, rejected token, unreachable backend) resolves to
    /// `None` rather than an error.
    pub fn restore_session(&self) -> Option<Session> {
        let cached = self.read_cached_session()?;

        match self.client.current_user(&cached.access_token) {
            Ok(user) => {
                let session = Session {
                    user_id: user.id,
                    email: user.email.unwrap_or(cached.email),
                    access_token: cached.access_token,
                };
                info!("Restored session for user {}", session.user_id);
                self.replace_state(Some(session.clone()));
                Some(session)
            }
            Err(e) => {
                debug!("Cached session is no longer valid: {}", e);
                None
            }
        }
    }

    /// Creates an account and signs the new user in.
    ///
    /// On success the session becomes the live session, is written to the
    /// cache file, and subscribers are notified. On failure existing session
    /// state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` from the backend, or an I/O error if the cache
    /// file cannot be written.
    pub fn sign_up(&self, email: &str, password: &str) -> AppResult<Session> {
        let token = self.client.sign_up(email, password)?;
        self.install_session(token)
    }

    /// Signs an existing user in. Same state contract as [`Self::sign_up`].
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` from the backend, or an I/O error if the cache
    /// file cannot be written.
    pub fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let token = self.client.sign_in_with_password(email, password)?;
        self.install_session(token)
    }

    /// Signs the current user out.
    ///
    /// Local session state and the cache file are cleared even when the
    /// remote call fails; the failure is still reported to the caller. With
    /// no live session this only clears leftover local state.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` if the remote sign-out failed, or an I/O error
    /// if the cache file could not be removed.
    pub fn sign_out(&self) -> AppResult<()> {
        let session = self.current_session();
        let remote = match &session {
            Some(s) => self.client.sign_out(&s.access_token),
            None => Ok(()),
        };

        if let Err(e) = &remote {
            warn!("Remote sign-out failed, clearing local session anyway: {}", e);
        }
        self.replace_state(None);
        let cache = self.remove_cached_session();

        remote?;
        cache
    }

    fn install_session(&self, token: TokenResponse) -> AppResult<Session> {
        let session = Session {
            user_id: token.user.id,
            email: token.user.email.unwrap_or_default(),
            access_token: token.access_token,
        };

        self.write_cached_session(&session)?;
        info!("Signed in as user {}", session.user_id);
        self.replace_state(Some(session.clone()));
        Ok(session)
    }

    fn replace_state(&self, next: Option<Session>) {
        *self.state.write().unwrap() = next.clone();

        let listeners = self.listeners.read().unwrap();
        for listener in listeners.iter() {
            listener(next.as_ref());
        }
    }

    fn read_cached_session(&self) -> Option<Session> {
        let contents = fs::read_to_string(&self.cache_path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("Ignoring malformed session cache: {}", e);
                None
            }
        }
    }

    fn write_cached_session(&self, session: &Session) -> AppResult<()> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.cache_path, contents)?;
        Ok(())
    }

    fn remove_cached_session(&self) -> AppResult<()> {
        match fs::remove_file(&self.cache_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
