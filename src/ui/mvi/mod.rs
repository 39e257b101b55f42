//! Model-View-Intent primitives for the headless view models.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ observers (CLI, host UI)
//!    ↑                               │
//!    └───────────────────────────────┘
//! ```
//!
//! - **State**: snapshot of everything a screen renders
//! - **Intent**: user action or pipeline result
//! - **Reducer**: pure `(State, Intent) -> State`
//! - **StateStore**: holds the current state and notifies watchers

mod intent;
mod reducer;
mod state;
mod store;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
pub use store::StateStore;
