//! FakeStoreAPI endpoints and their payloads.

mod auth;
mod models;
mod products;

use futures_util::future::BoxFuture;

use crate::network::{CallError, HttpResponse};

pub use auth::AuthApi;
pub use models::{AuthResponse, Cart, CartItem, LoginRequest, Product, Rating, User};
pub use products::ProductApi;

/// A not-yet-started HTTP exchange, ready to hand to the result pipeline.
pub type ApiCall = BoxFuture<'static, Result<HttpResponse, CallError>>;
