//! Endpoint orchestration with session side effects.
//!
//! Repositories expose each endpoint as an [`ApiStream`], so callers see the
//! same `Loading` then terminal sequence whatever the backing source is.

mod auth;
mod product;

use crate::api::{AuthResponse, Cart, Product};
use crate::network::ApiStream;

pub use auth::RemoteAuthRepository;
pub use product::RemoteProductRepository;

pub trait AuthRepository: Send + Sync {
    /// Saves the session when the call succeeds.
    fn login(&self, email: &str, password: &str) -> ApiStream<AuthResponse>;

    /// Clears the local session once the call finishes, whatever its outcome.
    fn logout(&self) -> ApiStream<()>;

    /// Clears the local session without contacting the backend.
    fn handle_session_expiry(&self) -> ApiStream<()>;

    fn is_session_valid(&self) -> bool;
}

pub trait ProductRepository: Send + Sync {
    fn products(&self, limit: u32) -> ApiStream<Vec<Product>>;
    fn products_by_category(&self, category: &str) -> ApiStream<Vec<Product>>;
    fn categories(&self) -> ApiStream<Vec<String>>;
    fn product(&self, id: i64) -> ApiStream<Product>;
    fn add_product(&self, product: &Product) -> ApiStream<Product>;
    fn update_product(&self, id: i64, product: &Product) -> ApiStream<Product>;
    fn delete_product(&self, id: i64) -> ApiStream<Product>;
    fn user_carts(&self, user_id: i64) -> ApiStream<Vec<Cart>>;
    fn create_cart(&self, cart: &Cart) -> ApiStream<Cart>;
    fn update_cart(&self, id: i64, cart: &Cart) -> ApiStream<Cart>;
    fn delete_cart(&self, id: i64) -> ApiStream<Cart>;
}
