use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fs2::FileExt;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{MasterKey, StorageError};

const STORE_FILE_NAME: &str = "secure_storage_prefs.json";
const KEY_FILE_NAME: &str = "master.key";
const FORMAT_VERSION: u32 = 1;

/// A single typed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
enum StoredValue {
    String(String),
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
}

/// On-disk envelope around the sealed entry map.
#[derive(Serialize, Deserialize)]
struct SealedFile {
    version: u32,
    /// Base64 of `nonce || ciphertext`.
    payload: String,
}

/// Encrypted key-value store.
///
/// Typed getters return the caller-supplied default when a key is absent or
/// holds a value of another type. Mutations are written through to disk;
/// a failed write is logged and otherwise invisible to the caller.
pub struct SecureStore {
    entries: RwLock<BTreeMap<String, StoredValue>>,
    backing: Option<Backing>,
}

struct Backing {
    path: PathBuf,
    lock_path: PathBuf,
    key: MasterKey,
}

impl SecureStore {
    /// Open (or create) the store in `dir`, generating a master key on first use.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let key = MasterKey::load_or_create(&dir.join(KEY_FILE_NAME))?;
        Self::open_with_key(dir, key)
    }

    /// Open the store in `dir` with an explicitly provided key.
    pub fn open_with_key(dir: &Path, key: MasterKey) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

        let backing = Backing {
            path: dir.join(STORE_FILE_NAME),
            lock_path: dir.join(format!("{}.lock", STORE_FILE_NAME)),
            key,
        };
        let entries = backing.load();
        tracing::debug!(
            path = %backing.path.display(),
            entries = entries.len(),
            "Secure store opened"
        );

        Ok(Self {
            entries: RwLock::new(entries),
            backing: Some(backing),
        })
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            backing: None,
        }
    }

    pub fn store_string(&self, key: &str, value: &str) {
        self.put(key, StoredValue::String(value.to_string()));
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.entries.read().get(key) {
            Some(StoredValue::String(value)) => value.clone(),
            _ => default.to_string(),
        }
    }

    pub fn store_boolean(&self, key: &str, value: bool) {
        self.put(key, StoredValue::Bool(value));
    }

    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        match self.entries.read().get(key) {
            Some(StoredValue::Bool(value)) => *value,
            _ => default,
        }
    }

    pub fn store_int(&self, key: &str, value: i32) {
        self.put(key, StoredValue::Int(value));
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.entries.read().get(key) {
            Some(StoredValue::Int(value)) => *value,
            _ => default,
        }
    }

    pub fn store_long(&self, key: &str, value: i64) {
        self.put(key, StoredValue::Long(value));
    }

    pub fn get_long(&self, key: &str, default: i64) -> i64 {
        match self.entries.read().get(key) {
            Some(StoredValue::Long(value)) => *value,
            _ => default,
        }
    }

    /// Store a float. Non-finite values cannot be persisted and are ignored.
    pub fn store_float(&self, key: &str, value: f32) {
        if !value.is_finite() {
            tracing::warn!(key, "Refusing to store non-finite float");
            return;
        }
        self.put(key, StoredValue::Float(value));
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.entries.read().get(key) {
            Some(StoredValue::Float(value)) => *value,
            _ => default,
        }
    }

    /// Serialize `value` to JSON and store it as a string.
    pub fn store_object<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.store_string(key, &json),
            Err(e) => tracing::warn!(key, error = %e, "Failed to serialize object"),
        }
    }

    /// Deserialize a JSON object stored under `key`.
    ///
    /// Returns `None` when the key is absent, empty, or holds a payload that
    /// does not decode as `T`.
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.get_string(key, "");
        if json.is_empty() {
            return None;
        }
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "Stored object did not decode");
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.persist(&entries);
    }

    /// Location of the sealed file, if this store is disk-backed.
    pub fn path(&self) -> Option<&Path> {
        self.backing.as_ref().map(|b| b.path.as_path())
    }

    fn put(&self, key: &str, value: StoredValue) {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value);
        self.persist(&entries);
    }

    fn persist(&self, entries: &BTreeMap<String, StoredValue>) {
        let Some(backing) = &self.backing else {
            return;
        };
        if let Err(e) = backing.save(entries) {
            tracing::warn!(path = %backing.path.display(), error = %e, "Failed to persist secure store");
        }
    }
}

impl Backing {
    /// Read and decrypt the entry map. Any failure yields an empty map.
    fn load(&self) -> BTreeMap<String, StoredValue> {
        if !self.path.exists() {
            return BTreeMap::new();
        }
        match self.try_load() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Secure store unreadable, starting empty"
                );
                BTreeMap::new()
            }
        }
    }

    fn try_load(&self) -> Result<BTreeMap<String, StoredValue>, StorageError> {
        let raw = fs::read(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        let file: SealedFile = serde_json::from_slice(&raw)?;
        let sealed = STANDARD.decode(file.payload)?;
        let plaintext = self.key.open(&sealed)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }

    /// Seal the entry map and atomically replace the store file.
    fn save(&self, entries: &BTreeMap<String, StoredValue>) -> Result<(), StorageError> {
        let plaintext = serde_json::to_vec(entries)?;
        let sealed = self.key.seal(&plaintext)?;
        let file = SealedFile {
            version: FORMAT_VERSION,
            payload: STANDARD.encode(sealed),
        };
        let contents = serde_json::to_vec(&file)?;

        // Serialize writers across processes sharing the directory.
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| StorageError::io(&self.lock_path, e))?;
        FileExt::lock_exclusive(&lock).map_err(|e| StorageError::io(&self.lock_path, e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(|e| StorageError::io(&tmp_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&tmp_path, perms).map_err(|e| StorageError::io(&tmp_path, e))?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        Ok(())
    }
}
