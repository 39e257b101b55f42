//! Session store and HTTP result pipeline for a FakeStoreAPI storefront client.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod network;
pub mod repository;
pub mod session;
pub mod storage;
pub mod ui;
pub mod usecase;

pub use app::{AppError, Storefront};
