//! Request/response stages wrapped around every API call.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};

use super::client::{CallError, ResponseHead};
use crate::session::SessionManager;

/// A stage in the request pipeline.
///
/// Both hooks are synchronous; they run on the task driving the request.
pub trait Interceptor: Send + Sync {
    /// Inspect or mutate the outbound request.
    fn on_request(&self, _request: &mut reqwest::Request) -> Result<(), CallError> {
        Ok(())
    }

    /// Inspect the response status before the body is read.
    fn on_response(&self, _head: &ResponseHead) -> Result<(), CallError> {
        Ok(())
    }
}

/// Attaches `Authorization: Bearer <token>` when a session token is stored.
///
/// The token read is a plain in-memory lookup in the secure store, so the
/// request task never waits on another task.
pub struct AuthInterceptor {
    session: Arc<SessionManager>,
}

impl AuthInterceptor {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }
}

impl Interceptor for AuthInterceptor {
    fn on_request(&self, request: &mut reqwest::Request) -> Result<(), CallError> {
        let Some(token) = self.session.token() else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|_| CallError::InvalidRequest("token is not a valid header value".into()))?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Turns a 401 on an authenticated request into a forced logout.
///
/// Unauthenticated requests (such as a login with bad credentials) pass
/// through untouched and are classified by status like any other failure.
pub struct SessionExpiryInterceptor {
    session: Arc<SessionManager>,
}

impl SessionExpiryInterceptor {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }
}

impl Interceptor for SessionExpiryInterceptor {
    fn on_response(&self, head: &ResponseHead) -> Result<(), CallError> {
        if head.status == 401 && head.authenticated {
            tracing::warn!(
                method = %head.method,
                path = %head.path,
                "Authenticated request rejected with 401"
            );
            self.session.expire();
            return Err(CallError::SessionExpired);
        }
        Ok(())
    }
}
