use super::ProductRepository;
use crate::api::{Cart, Product, ProductApi};
use crate::network::{safe_api_call, ApiStream};

pub struct RemoteProductRepository {
    api: ProductApi,
}

impl RemoteProductRepository {
    pub fn new(api: ProductApi) -> Self {
        Self { api }
    }
}

impl ProductRepository for RemoteProductRepository {
    fn products(&self, limit: u32) -> ApiStream<Vec<Product>> {
        safe_api_call(self.api.products(limit))
    }

    fn products_by_category(&self, category: &str) -> ApiStream<Vec<Product>> {
        safe_api_call(self.api.products_by_category(category))
    }

    fn categories(&self) -> ApiStream<Vec<String>> {
        safe_api_call(self.api.categories())
    }

    fn product(&self, id: i64) -> ApiStream<Product> {
        safe_api_call(self.api.product(id))
    }

    fn add_product(&self, product: &Product) -> ApiStream<Product> {
        safe_api_call(self.api.add_product(product))
    }

    fn update_product(&self, id: i64, product: &Product) -> ApiStream<Product> {
        safe_api_call(self.api.update_product(id, product))
    }

    fn delete_product(&self, id: i64) -> ApiStream<Product> {
        safe_api_call(self.api.delete_product(id))
    }

    fn user_carts(&self, user_id: i64) -> ApiStream<Vec<Cart>> {
        safe_api_call(self.api.user_carts(user_id))
    }

    fn create_cart(&self, cart: &Cart) -> ApiStream<Cart> {
        safe_api_call(self.api.create_cart(cart))
    }

    fn update_cart(&self, id: i64, cart: &Cart) -> ApiStream<Cart> {
        safe_api_call(self.api.update_cart(id, cart))
    }

    fn delete_cart(&self, id: i64) -> ApiStream<Cart> {
        safe_api_call(self.api.delete_cart(id))
    }
}
