use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::StreamExt;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::form::LoginForm;
use super::intent::AuthIntent;
use super::reducer::AuthReducer;
use super::state::{AuthState, AuthUiEvent, UserState};
use crate::network::ApiResult;
use crate::session::{SessionEvent, SessionManager};
use crate::storage::{SecureStore, StorageKeys};
use crate::ui::mvi::StateStore;
use crate::usecase::{LoginUseCase, LogoutUseCase};

const EVENT_CAPACITY: usize = 16;

/// Login, logout and session bookkeeping for the auth screens.
pub struct AuthViewModel {
    login_use_case: LoginUseCase,
    logout_use_case: LogoutUseCase,
    session: Arc<SessionManager>,
    store: Arc<SecureStore>,
    state: StateStore<AuthReducer>,
    events: broadcast::Sender<AuthUiEvent>,
    // Never written; dropping it stops the session watcher.
    alive: watch::Sender<()>,
}

impl AuthViewModel {
    pub fn new(
        login_use_case: LoginUseCase,
        logout_use_case: LogoutUseCase,
        session: Arc<SessionManager>,
        store: Arc<SecureStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (alive, _) = watch::channel(());
        Self {
            login_use_case,
            logout_use_case,
            session,
            store,
            state: StateStore::new(),
            events,
            alive,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.snapshot()
    }

    pub fn watch_state(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Events are not replayed; subscribe before triggering actions.
    pub fn events(&self) -> broadcast::Receiver<AuthUiEvent> {
        self.events.subscribe()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// Validate the form, then run the login pipeline to completion.
    pub async fn login(&self, email: &str, password: &str) {
        if let Err(errors) = LoginForm::new(email, password).validate() {
            let message = errors.first_message().unwrap_or_default().to_string();
            self.state.dispatch(AuthIntent::FormRejected(errors));
            self.emit(AuthUiEvent::Error(message));
            return;
        }

        let mut results = self.login_use_case.call(email.trim(), password);
        while let Some(result) = results.next().await {
            match result {
                ApiResult::Success(auth) => {
                    self.store_session_state(&auth.user.email, &auth.user.name);
                    self.state
                        .dispatch(AuthIntent::LoginUpdated(ApiResult::Success(())));
                    self.emit(AuthUiEvent::LoginSuccess);
                }
                ApiResult::Error(err) => {
                    let message = err.message.clone();
                    self.state
                        .dispatch(AuthIntent::LoginUpdated(ApiResult::Error(err)));
                    self.emit(AuthUiEvent::Error(message));
                }
                other => self
                    .state
                    .dispatch(AuthIntent::LoginUpdated(other.map(|_| ()))),
            }
        }
    }

    /// Log out remotely; the local session is cleared whatever the outcome.
    pub async fn logout(&self) {
        self.store
            .store_long(StorageKeys::LAST_LOGOUT_TIMESTAMP, unix_millis());

        let mut results = self.logout_use_case.call();
        while let Some(result) = results.next().await {
            if result.is_terminal() {
                self.state.dispatch(AuthIntent::LogoutCompleted);
                self.store.remove(StorageKeys::USER_STATE);
                self.emit(AuthUiEvent::LogoutSuccess);
            }
        }
    }

    pub fn reset_logout_event(&self) {
        self.state.dispatch(AuthIntent::ResetLogoutEvent);
    }

    pub async fn check_auth_status(&self) {
        if !self.session.is_logged_in() {
            self.logout().await;
            self.emit(AuthUiEvent::Unauthorized);
        }
    }

    /// The local session is cleared before the remote logout, so the
    /// rejected token is not sent again.
    pub async fn handle_session_expiry(&self) {
        self.session.logout();
        self.logout().await;
        self.emit(AuthUiEvent::SessionExpired);
    }

    /// Check a session left over from a previous run.
    ///
    /// Returns `true` when a stored session is still usable. A stored but
    /// invalid session is logged out and reported as expired.
    pub async fn restore_session(&self) -> bool {
        let user_state = self.store.get_object::<UserState>(StorageKeys::USER_STATE);
        let flagged = self.store.get_boolean(StorageKeys::IS_LOGGED_IN, false);
        if user_state.is_none() || !flagged {
            return false;
        }

        if self.session.is_session_valid() {
            return true;
        }
        tracing::info!("Stored session is no longer valid");
        self.handle_session_expiry().await;
        false
    }

    pub fn last_logged_in_email(&self) -> String {
        self.store.get_string(StorageKeys::LAST_LOGGED_IN_EMAIL, "")
    }

    pub fn time_since_last_login(&self) -> Option<Duration> {
        let last = self.store.get_long(StorageKeys::LAST_LOGIN_TIMESTAMP, 0);
        if last <= 0 {
            return None;
        }
        let elapsed = unix_millis().saturating_sub(last).max(0);
        Some(Duration::from_millis(elapsed as u64))
    }

    pub fn user_state(&self) -> Option<UserState> {
        self.store.get_object(StorageKeys::USER_STATE)
    }

    /// Forward session expiries raised outside this view model (for example
    /// by a 401 on any authenticated call) as [`AuthUiEvent::SessionExpired`].
    ///
    /// The task ends when the view model is dropped.
    pub fn watch_session_events(self: &Arc<Self>) -> JoinHandle<()> {
        let mut session_events = self.session.subscribe();
        let mut alive = self.alive.subscribe();
        let view_model: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = alive.changed() => break,
                    event = session_events.recv() => event,
                };
                match event {
                    Ok(SessionEvent::Expired) => {
                        let Some(strong) = view_model.upgrade() else {
                            break;
                        };
                        strong.store.remove(StorageKeys::USER_STATE);
                        strong.emit(AuthUiEvent::SessionExpired);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Session events lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("Session watcher stopped");
        })
    }

    fn store_session_state(&self, email: &str, name: &str) {
        self.store
            .store_long(StorageKeys::LAST_LOGIN_TIMESTAMP, unix_millis());
        self.store.store_string(StorageKeys::LAST_LOGGED_IN_EMAIL, email);
        self.store.store_string(StorageKeys::USER_NAME, name);

        let user_state = UserState {
            is_logged_in: true,
            name: name.to_string(),
            email: email.to_string(),
            user_id: self.store.get_string(StorageKeys::USER_ID, ""),
        };
        self.store.store_object(StorageKeys::USER_STATE, &user_state);
    }

    fn emit(&self, event: AuthUiEvent) {
        tracing::debug!(?event, "Auth event");
        let _ = self.events.send(event);
    }
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
