use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront::storage::{MasterKey, SecureStore, StorageKeys};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Address {
    street: String,
    zip: u32,
}

#[test]
fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = SecureStore::open(dir.path()).unwrap();
        store.store_string(StorageKeys::AUTH_TOKEN, "T");
        store.store_boolean(StorageKeys::IS_LOGGED_IN, true);
        store.store_int("visits", 3);
        store.store_long(StorageKeys::LAST_LOGIN_TIMESTAMP, 1_700_000_000_000);
        store.store_float("zoom", 1.5);
        store.store_object(
            StorageKeys::ADDRESS_PRIMARY,
            &Address {
                street: "Main".into(),
                zip: 12345,
            },
        );
    }

    let store = SecureStore::open(dir.path()).unwrap();
    assert_eq!(store.get_string(StorageKeys::AUTH_TOKEN, ""), "T");
    assert!(store.get_boolean(StorageKeys::IS_LOGGED_IN, false));
    assert_eq!(store.get_int("visits", 0), 3);
    assert_eq!(
        store.get_long(StorageKeys::LAST_LOGIN_TIMESTAMP, 0),
        1_700_000_000_000
    );
    assert_eq!(store.get_float("zoom", 0.0), 1.5);
    assert_eq!(
        store.get_object::<Address>(StorageKeys::ADDRESS_PRIMARY),
        Some(Address {
            street: "Main".into(),
            zip: 12345
        })
    );
}

#[test]
fn test_wrong_key_starts_empty() {
    let dir = TempDir::new().unwrap();
    {
        let store = SecureStore::open(dir.path()).unwrap();
        store.store_string(StorageKeys::USER_ID, "1");
    }

    let store = SecureStore::open_with_key(dir.path(), MasterKey::generate()).unwrap();
    assert!(!store.contains(StorageKeys::USER_ID));
    assert_eq!(store.get_string(StorageKeys::USER_ID, "none"), "none");
}

#[test]
fn test_corrupt_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = {
        let store = SecureStore::open(dir.path()).unwrap();
        store.store_string(StorageKeys::USER_ID, "1");
        store.path().unwrap().to_path_buf()
    };
    std::fs::write(&path, b"{ not json").unwrap();

    let store = SecureStore::open(dir.path()).unwrap();
    assert!(!store.contains(StorageKeys::USER_ID));

    // Writing recovers the file.
    store.store_string(StorageKeys::USER_ID, "2");
    let reopened = SecureStore::open(dir.path()).unwrap();
    assert_eq!(reopened.get_string(StorageKeys::USER_ID, ""), "2");
}

#[test]
fn test_remove_and_clear_persist() {
    let dir = TempDir::new().unwrap();
    {
        let store = SecureStore::open(dir.path()).unwrap();
        store.store_string("a", "1");
        store.store_string("b", "2");
        store.remove("a");
    }
    {
        let store = SecureStore::open(dir.path()).unwrap();
        assert!(!store.contains("a"));
        assert!(store.contains("b"));
        store.clear();
    }
    let store = SecureStore::open(dir.path()).unwrap();
    assert!(!store.contains("b"));
}

#[test]
fn test_incompatible_object_is_none() {
    let store = SecureStore::in_memory();
    store.store_string(StorageKeys::USER_STATE, r#"{"unexpected": true}"#);
    assert_eq!(store.get_object::<Address>(StorageKeys::USER_STATE), None);
    assert_eq!(store.get_object::<Address>("never_stored"), None);
}

#[test]
fn test_concurrent_writers_keep_every_key() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SecureStore::open(dir.path()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..10 {
                    store.store_int(&format!("w{}_{}", worker, i), i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let reopened = SecureStore::open(dir.path()).unwrap();
    for worker in 0..4 {
        for i in 0..10 {
            assert_eq!(reopened.get_int(&format!("w{}_{}", worker, i), -1), i);
        }
    }
}
