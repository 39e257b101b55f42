use serde::{Deserialize, Serialize};

use super::form::FormErrors;
use crate::network::ApiResult;
use crate::ui::mvi::UiState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub login: ApiResult<()>,
    /// Set once a logout finished; hosts reset it after navigating away.
    pub logout_event: bool,
    pub form_errors: FormErrors,
}

impl UiState for AuthState {}

/// Summary of the signed-in user kept in the store under `user_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub is_logged_in: bool,
    pub name: String,
    pub email: String,
    pub user_id: String,
}

/// One-shot notifications for the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthUiEvent {
    LoginSuccess,
    LogoutSuccess,
    SessionExpired,
    Unauthorized,
    Error(String),
}
