use keyhold::{KeyedStore, ManagedStore, TransactionalStore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::tempdir;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    name: String,
    age: i32,
}

#[test]
fn test_compat_surface_scenario() {
    let dir = tempdir().unwrap();
    let mut store = TransactionalStore::with_filename(dir.path().join("test.db")).unwrap();

    assert!(store.store("alpha", json!(42)));
    assert!(!store.store("alpha", json!(99)));
    assert_eq!(store.get("alpha"), Some(json!(42)));
    assert!(store.delete("alpha"));
    assert!(!store.delete("alpha"));
    assert_eq!(store.get("alpha"), None);
    assert!(store.get_all().is_empty());
}

#[test]
fn test_compat_surface_collapses_faults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("faulty.db");
    let mut store = TransactionalStore::with_filename(&path).unwrap();
    store.try_store("alpha", json!(42)).unwrap();

    // Every operation reopens the container, so corrupting the file turns
    // each subsequent call into an engine fault. The compat surface must
    // collapse those to false/None/empty instead of propagating.
    std::fs::write(&path, b"not json at all").unwrap();

    assert!(!store.store("beta", json!(1)));
    assert_eq!(store.get("alpha"), None);
    assert!(store.get_all().is_empty());
    assert!(!store.delete("alpha"));
    assert!(!store.clear());
}

#[test]
fn test_values_survive_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("restart.db");

    {
        let mut store = TransactionalStore::with_filename(&path).unwrap();
        store.try_store("greeting", json!("hello")).unwrap();
        store
            .try_store("numbers", json!([1, 2, 3, {"deep": null}]))
            .unwrap();
    }

    let mut store = TransactionalStore::with_filename(&path).unwrap();
    assert_eq!(store.try_get("greeting").unwrap(), json!("hello"));
    assert_eq!(
        store.try_get("numbers").unwrap(),
        json!([1, 2, 3, {"deep": null}])
    );
}

#[test]
fn test_policies_share_one_container() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let mut writer = TransactionalStore::with_filename(&path).unwrap();
    writer.try_store("from-transactional", json!(1)).unwrap();

    let mut reader = ManagedStore::with_filename(&path);
    reader.open().unwrap();
    assert_eq!(reader.try_get("from-transactional").unwrap(), json!(1));
    reader.try_store("from-managed", json!(2)).unwrap();
    reader.close().unwrap();

    let all = writer.try_get_all().unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn test_struct_payload_round_trip() {
    let dir = tempdir().unwrap();
    let mut store = TransactionalStore::with_filename(dir.path().join("users")).unwrap();

    let user = User {
        name: "Alice".to_string(),
        age: 30,
    };
    store
        .try_store("user1", serde_json::to_value(&user).unwrap())
        .unwrap();

    let got: User = serde_json::from_value(store.try_get("user1").unwrap()).unwrap();
    assert_eq!(user, got);
}
