use std::sync::Arc;

use futures_util::stream::{self, StreamExt};

use super::AuthRepository;
use crate::api::{AuthApi, AuthResponse, LoginRequest};
use crate::network::{safe_api_call, ApiResult, ApiStream, NoContent};
use crate::session::SessionManager;

pub struct RemoteAuthRepository {
    api: AuthApi,
    session: Arc<SessionManager>,
}

impl RemoteAuthRepository {
    pub fn new(api: AuthApi, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }
}

impl AuthRepository for RemoteAuthRepository {
    fn login(&self, email: &str, password: &str) -> ApiStream<AuthResponse> {
        let session = Arc::clone(&self.session);
        safe_api_call::<AuthResponse, _>(self.api.login(&LoginRequest::new(email, password)))
            .inspect(move |result| {
                if let ApiResult::Success(auth) = result {
                    session.save_session(
                        &auth.token,
                        &auth.user.id,
                        &auth.user.name,
                        &auth.user.email,
                    );
                }
            })
            .boxed()
    }

    // The session is cleared after the call so the request still carries
    // the bearer token, or when the stream is dropped before it finishes.
    fn logout(&self) -> ApiStream<()> {
        let mut guard = LogoutGuard::new(Arc::clone(&self.session));
        safe_api_call::<NoContent, _>(self.api.logout())
            .map(|result| result.map(|_| ()))
            .inspect(move |result| {
                if result.is_terminal() {
                    if let ApiResult::Error(err) = result {
                        tracing::info!(error = %err, "Logout call failed, clearing session anyway");
                    }
                    guard.clear();
                }
            })
            .boxed()
    }

    fn handle_session_expiry(&self) -> ApiStream<()> {
        let session = Arc::clone(&self.session);
        stream::once(async move {
            session.logout();
            ApiResult::Success(())
        })
        .boxed()
    }

    fn is_session_valid(&self) -> bool {
        self.session.is_session_valid()
    }
}

/// Clears the session exactly once: on the terminal logout result, or on
/// drop if the logout stream was abandoned first.
struct LogoutGuard {
    session: Arc<SessionManager>,
    cleared: bool,
}

impl LogoutGuard {
    fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            cleared: false,
        }
    }

    fn clear(&mut self) {
        if !self.cleared {
            self.cleared = true;
            self.session.logout();
        }
    }
}

impl Drop for LogoutGuard {
    fn drop(&mut self) {
        if !self.cleared {
            tracing::info!("Logout cancelled, clearing session");
            self.clear();
        }
    }
}
