//! AES-256-GCM sealing with a locally persisted master key.

use std::fs;
use std::path::Path;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use zeroize::Zeroizing;

use super::StorageError;

/// Size of the AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;

/// Symmetric key protecting the secure store.
///
/// The key bytes are wiped from memory when the value is dropped.
pub struct MasterKey(Zeroizing<[u8; KEY_LEN]>);

impl MasterKey {
    /// Generate a fresh random key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut bytes[..]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Load the key stored at `path`, creating it on first use.
    ///
    /// A newly created key file is restricted to the owner on Unix.
    pub fn load_or_create(path: &Path) -> Result<Self, StorageError> {
        if path.exists() {
            let raw = Zeroizing::new(fs::read(path).map_err(|e| StorageError::io(path, e))?);
            if raw.len() != KEY_LEN {
                return Err(StorageError::InvalidKey {
                    path: path.to_path_buf(),
                    len: raw.len(),
                });
            }
            let mut bytes = [0u8; KEY_LEN];
            bytes.copy_from_slice(&raw);
            tracing::debug!(path = %path.display(), "Loaded master key");
            return Ok(Self::from_bytes(bytes));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let key = Self::generate();
        fs::write(path, &key.0[..]).map_err(|e| StorageError::io(path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, perms).map_err(|e| StorageError::io(path, e))?;
        }

        tracing::info!(path = %path.display(), "Created new master key");
        Ok(key)
    }

    /// Encrypt `plaintext`, returning `nonce || ciphertext`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, StorageError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0[..]));

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| StorageError::Encrypt)?;

        let mut sealed = nonce_bytes.to_vec();
        sealed.extend(ciphertext);
        Ok(sealed)
    }

    /// Decrypt data produced by [`MasterKey::seal`].
    pub fn open(&self, data: &[u8]) -> Result<Vec<u8>, StorageError> {
        if data.len() < NONCE_LEN {
            return Err(StorageError::Decrypt);
        }

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0[..]));
        let (nonce, ciphertext) = data.split_at(NONCE_LEN);

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StorageError::Decrypt)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MasterKey(••••••••)")
    }
}
