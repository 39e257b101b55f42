//! Shared test utilities.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use futures_util::StreamExt;
use std::net::TcpListener;
use std::sync::Arc;
use storefront::config::{ApiConfig, Config};
use storefront::network::{ApiResult, ApiStream, ConnectivityMonitor, HostReachability};
use storefront::storage::SecureStore;
use storefront::Storefront;
use tempfile::TempDir;

pub const LOGIN_OK: &str =
    r#"{"token":"T","user":{"id":"1","name":"A","email":"a@b.com"}}"#;

pub const PRODUCTS: &str = r#"[
    {"id":1,"title":"Backpack","price":109.95,"description":"d","category":"men's clothing","image":"https://fakestoreapi.com/img/1.jpg","rating":{"rate":3.9,"count":120}},
    {"id":2,"title":"T-Shirt","price":22.3,"description":"d","category":"men's clothing","image":"https://fakestoreapi.com/img/2.jpg","rating":{"rate":4.1,"count":259}}
]"#;

/// Find an available port for testing.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}

pub fn config_for(base_url: &str) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
            connect_timeout_seconds: 2,
            ..ApiConfig::default()
        },
        ..Config::default()
    }
}

/// App wired to `base_url` with an in-memory store and host-driven
/// reachability (initially connected).
pub fn test_app(base_url: &str) -> (Storefront, Arc<HostReachability>) {
    test_app_with_config(config_for(base_url))
}

pub fn test_app_with_config(config: Config) -> (Storefront, Arc<HostReachability>) {
    let host = Arc::new(HostReachability::new(true));
    let app = Storefront::with_parts(
        config,
        Arc::new(SecureStore::in_memory()),
        ConnectivityMonitor::new(host.clone()),
    )
    .expect("Failed to build app");
    (app, host)
}

/// App backed by an encrypted store in `dir`.
pub fn disk_app(base_url: &str, dir: &TempDir) -> Storefront {
    let store = SecureStore::open(dir.path()).expect("Failed to open store");
    Storefront::with_parts(
        config_for(base_url),
        Arc::new(store),
        ConnectivityMonitor::new(Arc::new(HostReachability::new(true))),
    )
    .expect("Failed to build app")
}

pub async fn collect<T>(stream: ApiStream<T>) -> Vec<ApiResult<T>> {
    stream.collect().await
}
