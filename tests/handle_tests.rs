use proptest::prelude::*;
use sovran_namedstore::{
    recover_typed, ErasedHandle, GenericHandle, MapError, NamedStore, SharedHandle, Slot,
    StoreKind, TypeToken, TypedHandle,
};
use std::sync::Arc;

#[test]
fn test_generic_handle_cannot_be_recovered() {
    let value: Arc<dyn std::any::Any + Send + Sync> = Arc::new(5i32);
    let handle: SharedHandle = Arc::new(GenericHandle::with_reference(value));

    assert_eq!(handle.store_kind(), StoreKind::Generic);
    assert_eq!(handle.type_token(), TypeToken::GENERIC);
    assert!(handle.untyped().is_some());
    assert!(matches!(
        recover_typed::<i32>(&handle),
        Err(MapError::GenericHandleMisuse)
    ));
}

#[test]
fn test_unattached_handle_is_null() {
    let handle: SharedHandle = Arc::new(TypedHandle::<String>::new());

    assert_eq!(handle.store_kind(), StoreKind::Specific);
    assert!(handle.untyped().is_none());
    assert!(matches!(
        recover_typed::<String>(&handle),
        Err(MapError::NullHandle)
    ));
}

#[test]
fn test_typed_accessor_aliases_slot() -> Result<(), MapError> {
    let value = Slot::new(10u32);
    let mut handle = TypedHandle::<u32>::new();
    handle.attach(&value);

    let typed = handle.typed_value().expect("attached");
    typed.with_mut(|n| *n *= 2)?;
    assert_eq!(value.get()?, 20);
    Ok(())
}

#[test]
fn test_is_checks_token() -> Result<(), MapError> {
    let store = NamedStore::new();
    store.insert_value("flag", true)?;

    let handle = store.lookup("flag")?;
    assert!(handle.is::<bool>());
    assert!(!handle.is::<u8>());
    Ok(())
}

#[derive(Debug, Clone)]
enum Stored {
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

fn arb_value() -> impl Strategy<Value = Stored> {
    prop_oneof![
        any::<i64>().prop_map(Stored::Int),
        any::<f64>().prop_map(Stored::Float),
        ".{0,16}".prop_map(Stored::Text),
        proptest::collection::vec(any::<u8>(), 0..16).prop_map(Stored::Bytes),
    ]
}

fn insert(store: &NamedStore, key: &str, value: &Stored) -> Result<TypeToken, MapError> {
    match value {
        Stored::Int(v) => store.insert_value(key, *v).map(|_| TypeToken::of::<i64>()),
        Stored::Float(v) => store.insert_value(key, *v).map(|_| TypeToken::of::<f64>()),
        Stored::Text(v) => store
            .insert_value(key, v.clone())
            .map(|_| TypeToken::of::<String>()),
        Stored::Bytes(v) => store
            .insert_value(key, v.clone())
            .map(|_| TypeToken::of::<Vec<u8>>()),
    }
}

fn recovers_equal(store: &NamedStore, key: &str, value: &Stored) -> Result<bool, MapError> {
    Ok(match value {
        Stored::Int(v) => store.get::<i64>(key)?.get()? == *v,
        Stored::Float(v) => store.get::<f64>(key)?.get()?.to_bits() == v.to_bits(),
        Stored::Text(v) => store.get::<String>(key)?.get()? == *v,
        Stored::Bytes(v) => store.get::<Vec<u8>>(key)?.get()? == *v,
    })
}

proptest! {
    /// N inserts under N distinct keys leave N entries
    #[test]
    fn size_matches_distinct_inserts(values in proptest::collection::vec(arb_value(), 0..32)) {
        let store = NamedStore::new();
        for (i, value) in values.iter().enumerate() {
            insert(&store, &format!("key-{}", i), value).unwrap();
        }
        prop_assert_eq!(store.len().unwrap(), values.len());
    }

    /// Every value comes back equal and with its own type's token
    #[test]
    fn round_trip_preserves_value_and_token(values in proptest::collection::vec(arb_value(), 1..16)) {
        let store = NamedStore::new();
        let mut tokens = Vec::new();
        for (i, value) in values.iter().enumerate() {
            tokens.push(insert(&store, &format!("key-{}", i), value).unwrap());
        }
        for (i, value) in values.iter().enumerate() {
            let key = format!("key-{}", i);
            prop_assert!(recovers_equal(&store, &key, value).unwrap());
            prop_assert_eq!(store.lookup(&key).unwrap().type_token(), tokens[i]);
        }
    }

    /// Asking for another stored type never succeeds
    #[test]
    fn wrong_type_is_always_a_mismatch(value in any::<i64>()) {
        let store = NamedStore::new();
        store.insert_value("v", value).unwrap();
        let handle = store.lookup("v").unwrap();

        prop_assert!(
            matches!(recover_typed::<i32>(&handle), Err(MapError::TypeMismatch { .. })),
            "i32 should not match i64"
        );
        prop_assert!(
            matches!(recover_typed::<u64>(&handle), Err(MapError::TypeMismatch { .. })),
            "u64 should not match i64"
        );
        prop_assert_eq!(recover_typed::<i64>(&handle).unwrap().get().unwrap(), value);
    }
}
