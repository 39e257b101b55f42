use super::form::FormErrors;
use super::intent::AuthIntent;
use super::state::AuthState;
use crate::network::ApiResult;
use crate::ui::mvi::Reducer;

pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Intent = AuthIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            AuthIntent::FormRejected(form_errors) => AuthState {
                form_errors,
                ..state
            },
            AuthIntent::LoginUpdated(login) => AuthState {
                login,
                form_errors: FormErrors::default(),
                ..state
            },
            AuthIntent::LogoutCompleted => AuthState {
                login: ApiResult::Initial,
                logout_event: true,
                ..state
            },
            AuthIntent::ResetLogoutEvent => AuthState {
                logout_event: false,
                ..state
            },
        }
    }
}
