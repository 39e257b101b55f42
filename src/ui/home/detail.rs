//! Single product screen.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;

use crate::api::Product;
use crate::network::ApiResult;
use crate::repository::ProductRepository;
use crate::ui::mvi::{Intent, Reducer, StateStore, UiState};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductDetailState {
    pub product_id: Option<i64>,
    pub product: ApiResult<Product>,
}

impl UiState for ProductDetailState {}

#[derive(Debug, Clone)]
pub enum ProductDetailIntent {
    Select(i64),
    Loaded(ApiResult<Product>),
}

impl Intent for ProductDetailIntent {}

pub struct ProductDetailReducer;

impl Reducer for ProductDetailReducer {
    type State = ProductDetailState;
    type Intent = ProductDetailIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ProductDetailIntent::Select(id) => ProductDetailState {
                product_id: Some(id),
                product: ApiResult::Initial,
            },
            ProductDetailIntent::Loaded(product) => ProductDetailState { product, ..state },
        }
    }
}

pub struct ProductDetailViewModel {
    products: Arc<dyn ProductRepository>,
    state: StateStore<ProductDetailReducer>,
}

impl ProductDetailViewModel {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self {
            products,
            state: StateStore::new(),
        }
    }

    pub fn state(&self) -> ProductDetailState {
        self.state.snapshot()
    }

    pub fn watch_state(&self) -> watch::Receiver<ProductDetailState> {
        self.state.subscribe()
    }

    pub async fn load(&self, id: i64) {
        self.state.dispatch(ProductDetailIntent::Select(id));
        let mut results = self.products.product(id);
        while let Some(result) = results.next().await {
            self.state.dispatch(ProductDetailIntent::Loaded(result));
        }
    }
}
