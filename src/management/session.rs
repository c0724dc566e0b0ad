use std::{collections::HashMap, sync::Arc};

use axum::http::{HeaderMap, header};
use tokio::sync::Mutex;

use crate::{types::Token, utils};

pub const SESSION_COOKIE: &str = "tastelist_session";

/// Idle lifetime of a session, in seconds.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Idle lifetime of a session that has not finished logging in, in seconds.
pub const PENDING_TTL_SECS: i64 = 10 * 60;

/// Most sessions without a token kept at once. The oldest one is dropped
/// when a new login would exceed it.
pub const MAX_PENDING_SESSIONS: usize = 1000;

/// Per-browser state between requests.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub oauth_state: Option<String>,
    pub token: Option<Token>,
    /// Epoch seconds of the last request that used the session.
    pub last_seen: i64,
}

impl Session {
    fn at(now: i64) -> Self {
        Self {
            last_seen: now,
            ..Self::default()
        }
    }

    fn is_pending(&self) -> bool {
        self.token.is_none()
    }
}

/// Server-side session storage keyed by the id in the session cookie.
///
/// Sessions live in memory only and disappear with the process. Idle sessions
/// expire: logged-in ones after `ttl`, pending ones after `pending_ttl`.
/// Expired entries are swept whenever a session is started or looked up. The
/// lock is never held across a call to Spotify.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    ttl: i64,
    pending_ttl: i64,
    max_pending: usize,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::with_limits(SESSION_TTL_SECS, PENDING_TTL_SECS, MAX_PENDING_SESSIONS)
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: i64, pending_ttl: i64, max_pending: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            pending_ttl,
            max_pending: max_pending.max(1),
        }
    }

    /// Opens an empty session and returns its id.
    pub async fn start(&self) -> String {
        let now = utils::now_epoch();
        let id = utils::generate_session_id();

        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, now);

        let pending = sessions.values().filter(|s| s.is_pending()).count();
        if pending >= self.max_pending {
            let oldest = sessions
                .iter()
                .filter(|(_, s)| s.is_pending())
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
            }
        }

        sessions.insert(id.clone(), Session::at(now));
        id
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.get(id).await.is_some()
    }

    /// Returns the live session and marks it as used.
    pub async fn get(&self, id: &str) -> Option<Session> {
        let now = utils::now_epoch();
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, now);

        let session = sessions.get_mut(id)?;
        session.last_seen = now;
        Some(session.clone())
    }

    pub async fn set_state(&self, id: &str, state: String) {
        let now = utils::now_epoch();
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::at(now));
        session.oauth_state = Some(state);
        session.last_seen = now;
    }

    pub async fn token(&self, id: &str) -> Option<Token> {
        self.get(id).await.and_then(|s| s.token)
    }

    pub async fn set_token(&self, id: &str, token: Token) {
        let now = utils::now_epoch();
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::at(now));
        session.token = Some(token);
        session.last_seen = now;
    }

    /// Moves a finished login into a new session and returns the new id.
    ///
    /// The session that carried the OAuth state is removed, so an id known
    /// before the login never holds a token.
    pub async fn complete_login(&self, id: &str, token: Token) -> String {
        let now = utils::now_epoch();
        let new_id = utils::generate_session_id();

        let mut sessions = self.sessions.lock().await;
        sessions.remove(id);
        sessions.insert(
            new_id.clone(),
            Session {
                oauth_state: None,
                token: Some(token),
                last_seen: now,
            },
        );
        new_id
    }

    pub async fn clear(&self, id: &str) {
        self.sessions.lock().await.remove(id);
    }

    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Drops every session that has been idle too long at `now`. Returns how
    /// many were removed.
    pub async fn prune(&self, now: i64) -> usize {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, now)
    }

    fn sweep(&self, sessions: &mut HashMap<String, Session>, now: i64) -> usize {
        let before = sessions.len();
        sessions.retain(|_, s| {
            let ttl = if s.is_pending() {
                self.pending_ttl
            } else {
                self.ttl
            };
            now < s.last_seen + ttl
        });
        before - sessions.len()
    }
}

/// Reads the session id out of the request's `Cookie` headers.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(id: &str, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn expired_session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
