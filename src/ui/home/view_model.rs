use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;

use super::intent::HomeIntent;
use super::reducer::HomeReducer;
use super::state::{HomeSection, HomeState};
use crate::network::{ApiError, ApiResult};
use crate::repository::AuthRepository;
use crate::ui::connectivity::ConnectivityTracker;
use crate::ui::mvi::StateStore;
use crate::usecase::GetProductsUseCase;

pub struct HomeViewModel {
    products: GetProductsUseCase,
    auth: Arc<dyn AuthRepository>,
    connectivity: ConnectivityTracker,
    state: StateStore<HomeReducer>,
}

impl HomeViewModel {
    pub fn new(
        products: GetProductsUseCase,
        auth: Arc<dyn AuthRepository>,
        connectivity: ConnectivityTracker,
    ) -> Self {
        Self {
            products,
            auth,
            connectivity,
            state: StateStore::new(),
        }
    }

    pub fn state(&self) -> HomeState {
        self.state.snapshot()
    }

    pub fn watch_state(&self) -> watch::Receiver<HomeState> {
        self.state.subscribe()
    }

    pub fn connectivity(&self) -> &ConnectivityTracker {
        &self.connectivity
    }

    pub fn is_network_error(&self, error: &ApiError) -> bool {
        self.connectivity.is_network_error(error)
    }

    /// Load every section concurrently. Sections do not wait on each other.
    pub async fn load_home_data(&self) {
        tokio::join!(
            self.load_section(HomeSection::Featured),
            self.load_section(HomeSection::NewArrivals),
            self.load_section(HomeSection::Popular),
        );
    }

    /// Dismiss a section's error and load it again. No-op otherwise.
    pub async fn clear_error(&self, section: HomeSection) {
        if !matches!(self.state.snapshot().section(section), ApiResult::Error(_)) {
            return;
        }
        self.state.dispatch(HomeIntent::ClearError(section));
        self.load_section(section).await;
    }

    async fn load_section(&self, section: HomeSection) {
        let mut results = self.products.call(section.limit());
        while let Some(result) = results.next().await {
            match result {
                ApiResult::Error(err) if err.code == Some(401) => {
                    tracing::info!(?section, "Unauthorized while loading home section");
                    self.auth.handle_session_expiry().for_each(|_| async {}).await;
                }
                result => self
                    .state
                    .dispatch(HomeIntent::SectionUpdated { section, result }),
            }
        }
    }
}
