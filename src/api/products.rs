use std::sync::Arc;

use super::{ApiCall, Cart, Product};
use crate::network::{ApiClient, ApiRequest};

/// Product and cart endpoints (https://fakestoreapi.com/docs).
#[derive(Clone)]
pub struct ProductApi {
    client: Arc<ApiClient>,
}

impl ProductApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn products(&self, limit: u32) -> ApiCall {
        self.call(ApiRequest::get("products").query("limit", limit))
    }

    pub fn products_by_category(&self, category: &str) -> ApiCall {
        self.call(ApiRequest::get("products/category").segment(category))
    }

    pub fn categories(&self) -> ApiCall {
        self.call(ApiRequest::get("products/categories"))
    }

    pub fn product(&self, id: i64) -> ApiCall {
        self.call(ApiRequest::get("products").segment(id))
    }

    pub fn add_product(&self, product: &Product) -> ApiCall {
        self.call(ApiRequest::post("products").json(product))
    }

    pub fn update_product(&self, id: i64, product: &Product) -> ApiCall {
        self.call(ApiRequest::put("products").segment(id).json(product))
    }

    pub fn delete_product(&self, id: i64) -> ApiCall {
        self.call(ApiRequest::delete("products").segment(id))
    }

    pub fn user_carts(&self, user_id: i64) -> ApiCall {
        self.call(ApiRequest::get("carts/user").segment(user_id))
    }

    pub fn create_cart(&self, cart: &Cart) -> ApiCall {
        self.call(ApiRequest::post("carts").json(cart))
    }

    pub fn update_cart(&self, id: i64, cart: &Cart) -> ApiCall {
        self.call(ApiRequest::put("carts").segment(id).json(cart))
    }

    pub fn delete_cart(&self, id: i64) -> ApiCall {
        self.call(ApiRequest::delete("carts").segment(id))
    }

    fn call(&self, request: ApiRequest) -> ApiCall {
        let client = Arc::clone(&self.client);
        Box::pin(async move { client.send(request).await })
    }
}
