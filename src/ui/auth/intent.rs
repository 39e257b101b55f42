use super::form::FormErrors;
use crate::network::ApiResult;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum AuthIntent {
    /// Validation failed; the login call was not made.
    FormRejected(FormErrors),
    /// An emission from the login pipeline.
    LoginUpdated(ApiResult<()>),
    LogoutCompleted,
    ResetLogoutEvent,
}

impl Intent for AuthIntent {}
