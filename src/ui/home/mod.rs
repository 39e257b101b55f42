mod detail;
mod intent;
mod reducer;
mod state;
mod view_model;

pub use detail::{ProductDetailIntent, ProductDetailReducer, ProductDetailState, ProductDetailViewModel};
pub use intent::HomeIntent;
pub use reducer::HomeReducer;
pub use state::{HomeSection, HomeState};
pub use view_model::HomeViewModel;
