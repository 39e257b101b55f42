//! Entry points the view models call.

use std::sync::Arc;

use crate::api::{AuthResponse, Product};
use crate::network::ApiStream;
use crate::repository::{AuthRepository, ProductRepository};

#[derive(Clone)]
pub struct LoginUseCase {
    repository: Arc<dyn AuthRepository>,
}

impl LoginUseCase {
    pub fn new(repository: Arc<dyn AuthRepository>) -> Self {
        Self { repository }
    }

    pub fn call(&self, email: &str, password: &str) -> ApiStream<AuthResponse> {
        self.repository.login(email, password)
    }
}

#[derive(Clone)]
pub struct LogoutUseCase {
    repository: Arc<dyn AuthRepository>,
}

impl LogoutUseCase {
    pub fn new(repository: Arc<dyn AuthRepository>) -> Self {
        Self { repository }
    }

    pub fn call(&self) -> ApiStream<()> {
        self.repository.logout()
    }
}

#[derive(Clone)]
pub struct GetProductsUseCase {
    repository: Arc<dyn ProductRepository>,
}

impl GetProductsUseCase {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub fn call(&self, limit: u32) -> ApiStream<Vec<Product>> {
        self.repository.products(limit)
    }

    pub fn by_category(&self, category: &str) -> ApiStream<Vec<Product>> {
        self.repository.products_by_category(category)
    }

    pub fn categories(&self) -> ApiStream<Vec<String>> {
        self.repository.categories()
    }
}
