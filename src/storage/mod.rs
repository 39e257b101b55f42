//! Encrypted key-value persistence.
//!
//! The store keeps decrypted entries in memory and writes the whole map
//! through to a single AES-256-GCM sealed file on every mutation. Reads never
//! touch the disk and never fail: an absent key yields the caller's default.

mod cipher;
mod keys;
mod secure_store;

use std::path::PathBuf;

use thiserror::Error;

pub use cipher::{MasterKey, KEY_LEN};
pub use keys::StorageKeys;
pub use secure_store::SecureStore;

/// Errors raised while opening or persisting the secure store.
///
/// Only construction surfaces these to callers; failures during individual
/// reads and writes are logged and swallowed by [`SecureStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Master key at '{path}' has invalid length {len} (expected {KEY_LEN})")]
    InvalidKey { path: PathBuf, len: usize },

    #[error("Encryption failed")]
    Encrypt,

    #[error("Decryption failed: data is corrupt or sealed with another key")]
    Decrypt,

    #[error("Store payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Failed to serialize store contents: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
