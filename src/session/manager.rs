use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tokio::sync::broadcast;

use super::SecureString;
use crate::storage::{SecureStore, StorageKeys};

const EVENT_CAPACITY: usize = 16;

/// Session lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was saved after a successful login.
    Started,
    /// The session was cleared by an explicit logout.
    Ended,
    /// The backend rejected the session token; local state was cleared.
    Expired,
}

/// Reads and writes authentication state through the secure store.
///
/// Nothing is cached here: every accessor re-reads the store, so there is no
/// separate copy of the session to invalidate.
pub struct SessionManager {
    store: Arc<SecureStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(store: Arc<SecureStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, events }
    }

    /// Overwrite the session after a successful login.
    pub fn save_session(&self, token: &str, user_id: &str, name: &str, email: &str) {
        self.store.store_string(StorageKeys::AUTH_TOKEN, token);
        self.store.store_string(StorageKeys::USER_ID, user_id);
        self.store.store_string(StorageKeys::USER_NAME, name);
        self.store.store_string(StorageKeys::USER_EMAIL, email);
        self.store.store_boolean(StorageKeys::IS_LOGGED_IN, true);

        tracing::info!(user_id, "Session saved");
        let _ = self.events.send(SessionEvent::Started);
    }

    pub fn token(&self) -> Option<SecureString> {
        self.read(StorageKeys::AUTH_TOKEN).map(SecureString::new)
    }

    pub fn user_id(&self) -> Option<String> {
        self.read(StorageKeys::USER_ID)
    }

    pub fn user_name(&self) -> Option<String> {
        self.read(StorageKeys::USER_NAME)
    }

    pub fn user_email(&self) -> Option<String> {
        self.read(StorageKeys::USER_EMAIL)
    }

    /// True when a non-blank token is stored.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some_and(|token| !token.is_blank())
    }

    /// Clear every session key and force the logged-in flag off.
    pub fn logout(&self) {
        self.clear();
        tracing::info!("Session cleared");
        let _ = self.events.send(SessionEvent::Ended);
    }

    /// Clear the session because the backend rejected its token.
    pub fn expire(&self) {
        self.clear();
        tracing::warn!("Session expired, local session cleared");
        let _ = self.events.send(SessionEvent::Expired);
    }

    /// Whether the stored token can still be used.
    ///
    /// Opaque tokens are valid while present. JWTs must also carry an `exp`
    /// claim in the future.
    pub fn is_session_valid(&self) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        if token.is_blank() {
            return false;
        }
        match jwt_expiry(token.expose()) {
            Some(exp) => exp > unix_now(),
            None => true,
        }
    }

    /// All non-empty session fields keyed by their storage key.
    pub fn session_data(&self) -> BTreeMap<String, String> {
        StorageKeys::SESSION
            .iter()
            .filter_map(|key| self.read(key).map(|value| (key.to_string(), value)))
            .collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn clear(&self) {
        for key in StorageKeys::SESSION {
            self.store.remove(key);
        }
        self.store.store_boolean(StorageKeys::IS_LOGGED_IN, false);
    }

    fn read(&self, key: &str) -> Option<String> {
        let value = self.store.get_string(key, "");
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Extract the `exp` claim (seconds since the epoch) from a JWT.
///
/// Returns `None` for anything that is not a three-segment token with a JSON
/// payload carrying a numeric `exp`.
fn jwt_expiry(token: &str) -> Option<i64> {
    let mut segments = token.split('.');
    let (_, payload, _) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    claims.get("exp")?.as_i64()
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
