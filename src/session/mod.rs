//! Authentication state persisted in the secure store.

mod manager;
mod secret;

pub use manager::{SessionEvent, SessionManager};
pub use secret::SecureString;
