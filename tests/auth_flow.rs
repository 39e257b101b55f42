mod common;

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use common::mock_backend::{MockBackend, MockResponse};
use common::{collect, config_for, disk_app, test_app, test_app_with_config, LOGIN_OK};
use futures_util::StreamExt;
use storefront::network::{ApiResult, ErrorKind};
use storefront::storage::StorageKeys;
use storefront::ui::auth::{AuthUiEvent, UserState};
use tempfile::TempDir;
use tokio::sync::broadcast;

async fn next_event(events: &mut broadcast::Receiver<AuthUiEvent>) -> AuthUiEvent {
    tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

fn expired_jwt() -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"1","exp":1}"#);
    format!("{}.{}.sig", header, payload)
}

#[tokio::test]
async fn test_login_saves_session() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::json(LOGIN_OK)).await;
    let (app, _) = test_app(&backend.base_url());

    let results = collect(app.login_use_case().call("a@b.com", "secret1")).await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_loading());
    assert_eq!(results[1].data().unwrap().token, "T");

    let session = app.session();
    assert_eq!(session.token().unwrap().expose(), "T");
    assert_eq!(session.user_id().as_deref(), Some("1"));
    assert_eq!(session.user_name().as_deref(), Some("A"));
    assert_eq!(session.user_email().as_deref(), Some("a@b.com"));
    assert!(session.is_logged_in());

    let request = &backend.captured_requests().await[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/auth/login");
    assert_eq!(
        request.json(),
        serde_json::json!({"email": "a@b.com", "password": "secret1"})
    );
}

#[tokio::test]
async fn test_login_timeout_leaves_session_untouched() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(LOGIN_OK).with_delay(2_500))
        .await;
    let mut config = config_for(&backend.base_url());
    config.api.timeout_seconds = 1;
    let (app, _) = test_app_with_config(config);

    let results = collect(app.login_use_case().call("a@b.com", "secret1")).await;

    assert_eq!(results[1].error().unwrap().kind, ErrorKind::Timeout);
    assert!(!app.session().is_logged_in());
    assert!(app.session().token().is_none());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_call_fails() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::error(500, "down")).await;
    let (app, _) = test_app(&backend.base_url());
    app.session().save_session("T", "1", "A", "a@b.com");

    let results = collect(app.logout_use_case().call()).await;

    assert_eq!(results[1].error().unwrap().code, Some(500));
    assert!(!app.session().is_logged_in());
    assert!(!app.store().get_boolean(StorageKeys::IS_LOGGED_IN, true));

    let request = &backend.captured_requests().await[0];
    assert_eq!(request.path, "/auth/logout");
    assert_eq!(request.header("authorization"), Some("Bearer T"));
}

#[tokio::test]
async fn test_logout_accepts_empty_body() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::json("")).await;
    let (app, _) = test_app(&backend.base_url());
    app.session().save_session("T", "1", "A", "a@b.com");

    let results = collect(app.logout_use_case().call()).await;

    assert_eq!(results, vec![ApiResult::Loading, ApiResult::Success(())]);
    assert!(!app.session().is_logged_in());
}

#[tokio::test]
async fn test_abandoned_logout_still_clears_session() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json("{}").with_delay(2_000))
        .await;
    let (app, _) = test_app(&backend.base_url());
    app.session().save_session("T", "1", "A", "a@b.com");

    let mut results = app.logout_use_case().call();
    assert_eq!(results.next().await, Some(ApiResult::Loading));
    assert!(app.session().is_logged_in());
    drop(results);

    assert!(!app.session().is_logged_in());
    assert!(app.session().token().is_none());
}

#[tokio::test]
async fn test_handle_session_expiry_is_local() {
    let backend = MockBackend::start().await;
    let (app, _) = test_app(&backend.base_url());
    app.session().save_session("T", "1", "A", "a@b.com");

    let results = collect(app.auth_repository().handle_session_expiry()).await;

    assert_eq!(results, vec![ApiResult::Success(())]);
    assert!(!app.session().is_logged_in());
    assert!(!app.auth_repository().is_session_valid());
    assert!(backend.captured_requests().await.is_empty());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::json(LOGIN_OK)).await;
    let dir = TempDir::new().unwrap();

    {
        let app = disk_app(&backend.base_url(), &dir);
        app.auth_view_model().login("a@b.com", "secret1").await;
    }

    let app = disk_app(&backend.base_url(), &dir);
    let auth = app.auth_view_model();
    assert!(auth.is_logged_in());
    assert!(auth.restore_session().await);
    assert_eq!(auth.last_logged_in_email(), "a@b.com");
    assert_eq!(auth.user_state().unwrap().user_id, "1");
}

#[tokio::test]
async fn test_view_model_login_success() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::json(LOGIN_OK)).await;
    let (app, _) = test_app(&backend.base_url());
    let auth = app.auth_view_model();
    let mut events = auth.events();

    auth.login("a@b.com", "secret1").await;

    assert_eq!(next_event(&mut events).await, AuthUiEvent::LoginSuccess);
    assert_eq!(auth.state().login, ApiResult::Success(()));
    assert_eq!(
        auth.user_state(),
        Some(UserState {
            is_logged_in: true,
            name: "A".into(),
            email: "a@b.com".into(),
            user_id: "1".into(),
        })
    );
    assert_eq!(auth.last_logged_in_email(), "a@b.com");
    assert!(auth.time_since_last_login().unwrap() < Duration::from_secs(60));
}

#[tokio::test]
async fn test_view_model_rejects_invalid_form() {
    let backend = MockBackend::start().await;
    let (app, _) = test_app(&backend.base_url());
    let auth = app.auth_view_model();
    let mut events = auth.events();

    auth.login("not-an-email", "secret1").await;

    assert_eq!(
        next_event(&mut events).await,
        AuthUiEvent::Error("Enter a valid email".into())
    );
    let state = auth.state();
    assert_eq!(state.login, ApiResult::Initial);
    assert_eq!(state.form_errors.email.as_deref(), Some("Enter a valid email"));
    assert!(backend.captured_requests().await.is_empty());
}

#[tokio::test]
async fn test_view_model_login_failure_reports_message() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::error(401, "bad")).await;
    let (app, _) = test_app(&backend.base_url());
    let auth = app.auth_view_model();
    let mut events = auth.events();

    auth.login("a@b.com", "secret1").await;

    assert_eq!(
        next_event(&mut events).await,
        AuthUiEvent::Error("API call failed with code: 401".into())
    );
    assert_eq!(auth.state().login.error().unwrap().kind, ErrorKind::AuthError);
    assert!(auth.time_since_last_login().is_none());
}

#[tokio::test]
async fn test_view_model_logout() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::json(LOGIN_OK)).await;
    backend.enqueue_response(MockResponse::json("{}")).await;
    let (app, _) = test_app(&backend.base_url());
    let auth = app.auth_view_model();

    auth.login("a@b.com", "secret1").await;
    let mut events = auth.events();
    auth.logout().await;

    assert_eq!(next_event(&mut events).await, AuthUiEvent::LogoutSuccess);
    assert!(auth.state().logout_event);
    assert!(auth.user_state().is_none());
    assert!(!auth.is_logged_in());
    assert!(app.store().get_long(StorageKeys::LAST_LOGOUT_TIMESTAMP, 0) > 0);

    auth.reset_logout_event();
    assert!(!auth.state().logout_event);
}

#[tokio::test]
async fn test_check_auth_status_when_logged_out() {
    let backend = MockBackend::start().await;
    let (app, _) = test_app(&backend.base_url());
    let auth = app.auth_view_model();
    let mut events = auth.events();

    auth.check_auth_status().await;

    assert_eq!(next_event(&mut events).await, AuthUiEvent::LogoutSuccess);
    assert_eq!(next_event(&mut events).await, AuthUiEvent::Unauthorized);
}

#[tokio::test]
async fn test_restore_session_with_expired_token() {
    let backend = MockBackend::start().await;
    let (app, _) = test_app(&backend.base_url());
    app.session()
        .save_session(&expired_jwt(), "1", "A", "a@b.com");
    app.store().store_object(
        StorageKeys::USER_STATE,
        &UserState {
            is_logged_in: true,
            name: "A".into(),
            email: "a@b.com".into(),
            user_id: "1".into(),
        },
    );
    let auth = app.auth_view_model();
    let mut events = auth.events();

    assert!(!auth.restore_session().await);

    assert_eq!(next_event(&mut events).await, AuthUiEvent::LogoutSuccess);
    assert_eq!(next_event(&mut events).await, AuthUiEvent::SessionExpired);
    assert!(!auth.is_logged_in());
    assert!(auth.user_state().is_none());
}

#[tokio::test]
async fn test_restore_session_without_stored_state() {
    let backend = MockBackend::start().await;
    let (app, _) = test_app(&backend.base_url());

    assert!(!app.auth_view_model().restore_session().await);
    assert!(backend.captured_requests().await.is_empty());
}

#[tokio::test]
async fn test_interceptor_expiry_reaches_auth_events() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::json(LOGIN_OK)).await;
    backend.enqueue_response(MockResponse::error(401, "expired")).await;
    let (app, _) = test_app(&backend.base_url());
    let auth = app.auth_view_model();
    let watcher = auth.watch_session_events();

    auth.login("a@b.com", "secret1").await;
    let mut events = auth.events();
    collect(app.products_use_case().call(5)).await;

    assert_eq!(next_event(&mut events).await, AuthUiEvent::SessionExpired);
    assert!(auth.user_state().is_none());
    assert!(!auth.is_logged_in());
    watcher.abort();
}

#[tokio::test]
async fn test_expired_restore_reports_expiry_once() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::error(401, "expired")).await;
    let (app, _) = test_app(&backend.base_url());
    app.session()
        .save_session(&expired_jwt(), "1", "A", "a@b.com");
    app.store().store_object(
        StorageKeys::USER_STATE,
        &UserState {
            is_logged_in: true,
            name: "A".into(),
            email: "a@b.com".into(),
            user_id: "1".into(),
        },
    );
    let auth = app.auth_view_model();
    let watcher = auth.watch_session_events();
    let mut events = auth.events();

    assert!(!auth.restore_session().await);

    assert_eq!(next_event(&mut events).await, AuthUiEvent::LogoutSuccess);
    assert_eq!(next_event(&mut events).await, AuthUiEvent::SessionExpired);
    assert!(
        tokio::time::timeout(Duration::from_millis(200), events.recv())
            .await
            .is_err()
    );

    let request = &backend.captured_requests().await[0];
    assert_eq!(request.path, "/auth/logout");
    assert_eq!(request.header("authorization"), None);
    watcher.abort();
}

#[tokio::test]
async fn test_session_watcher_stops_with_view_model() {
    let backend = MockBackend::start().await;
    let (app, _) = test_app(&backend.base_url());
    let auth = app.auth_view_model();
    let watcher = auth.watch_session_events();

    drop(auth);

    tokio::time::timeout(Duration::from_secs(2), watcher)
        .await
        .expect("watcher outlived its view model")
        .unwrap();
}
