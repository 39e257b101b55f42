mod form;
mod intent;
mod reducer;
mod state;
mod view_model;

pub use form::{FormErrors, LoginForm};
pub use intent::AuthIntent;
pub use reducer::AuthReducer;
pub use state::{AuthState, AuthUiEvent, UserState};
pub use view_model::AuthViewModel;
