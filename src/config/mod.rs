//! Application configuration.
//!
//! Loaded once at startup from a TOML file; every section has defaults so a
//! missing file yields a working configuration pointed at FakeStoreAPI.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, Config, ConnectivityConfig, StorageConfig};
