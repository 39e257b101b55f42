//! Composition root.
//!
//! Everything process-scoped (store, session, HTTP client, connectivity)
//! is built once here and handed out as `Arc`s; view models are created on
//! demand from those shared parts.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{AuthApi, ProductApi};
use crate::config::{Config, ConfigError};
use crate::network::{
    ApiClient, AuthInterceptor, CallError, ConnectivityMonitor, SessionExpiryInterceptor,
};
use crate::repository::{
    AuthRepository, ProductRepository, RemoteAuthRepository, RemoteProductRepository,
};
use crate::session::SessionManager;
use crate::storage::{SecureStore, StorageError};
use crate::ui::auth::AuthViewModel;
use crate::ui::connectivity::ConnectivityTracker;
use crate::ui::home::{HomeViewModel, ProductDetailViewModel};
use crate::usecase::{GetProductsUseCase, LoginUseCase, LogoutUseCase};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open secure storage: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] CallError),
}

pub struct Storefront {
    config: Config,
    store: Arc<SecureStore>,
    session: Arc<SessionManager>,
    client: Arc<ApiClient>,
    connectivity: ConnectivityMonitor,
    auth_repository: Arc<dyn AuthRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl Storefront {
    /// Open the on-disk store and probe connectivity against the configured host.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let store = Arc::new(SecureStore::open(&config.storage.dir)?);
        let connectivity = ConnectivityMonitor::probing(&config.connectivity);
        Self::with_parts(config, store, connectivity)
    }

    /// Build around an existing store and connectivity source.
    pub fn with_parts(
        config: Config,
        store: Arc<SecureStore>,
        connectivity: ConnectivityMonitor,
    ) -> Result<Self, AppError> {
        config.validate()?;

        let session = Arc::new(SessionManager::new(Arc::clone(&store)));
        let client = Arc::new(
            ApiClient::new(&config.api)?
                .with_interceptor(Arc::new(AuthInterceptor::new(Arc::clone(&session))))
                .with_interceptor(Arc::new(SessionExpiryInterceptor::new(Arc::clone(
                    &session,
                )))),
        );

        let auth_repository: Arc<dyn AuthRepository> = Arc::new(RemoteAuthRepository::new(
            AuthApi::new(Arc::clone(&client)),
            Arc::clone(&session),
        ));
        let product_repository: Arc<dyn ProductRepository> = Arc::new(
            RemoteProductRepository::new(ProductApi::new(Arc::clone(&client))),
        );

        tracing::info!(base_url = %client.base_url(), "Storefront initialized");

        Ok(Self {
            config,
            store,
            session,
            client,
            connectivity,
            auth_repository,
            product_repository,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<SecureStore> {
        &self.store
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        Arc::clone(&self.auth_repository)
    }

    pub fn product_repository(&self) -> Arc<dyn ProductRepository> {
        Arc::clone(&self.product_repository)
    }

    pub fn login_use_case(&self) -> LoginUseCase {
        LoginUseCase::new(self.auth_repository())
    }

    pub fn logout_use_case(&self) -> LogoutUseCase {
        LogoutUseCase::new(self.auth_repository())
    }

    pub fn products_use_case(&self) -> GetProductsUseCase {
        GetProductsUseCase::new(self.product_repository())
    }

    pub fn auth_view_model(&self) -> Arc<AuthViewModel> {
        Arc::new(AuthViewModel::new(
            self.login_use_case(),
            self.logout_use_case(),
            Arc::clone(&self.session),
            Arc::clone(&self.store),
        ))
    }

    /// Must be called within a Tokio runtime.
    pub fn home_view_model(&self) -> HomeViewModel {
        HomeViewModel::new(
            self.products_use_case(),
            self.auth_repository(),
            ConnectivityTracker::new(self.connectivity.clone()),
        )
    }

    pub fn product_detail_view_model(&self) -> ProductDetailViewModel {
        ProductDetailViewModel::new(self.product_repository())
    }
}
