//! Registers a few values of different types by name and fetches them back.
//!
//! Run with: RUST_LOG=debug cargo run --example registry

use sovran_namedstore::{recover_typed, ErasedHandle, MapError, NamedStore, Slot, StoreKind};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Endpoint {
    host: String,
    port: u16,
}

fn main() -> Result<(), MapError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = NamedStore::new();

    // Caller-owned values, shared with the store
    let retries = Slot::new(3u32);
    let timeout = Slot::new(2.5f64);
    let endpoint = Slot::new(Endpoint {
        host: "localhost".to_string(),
        port: 8080,
    });

    store.insert("retries", &retries)?;
    store.insert("timeout", &timeout)?;
    store.insert("endpoint", &endpoint)?;
    println!("Store has {} entries", store.len()?);

    // Inspect handles without knowing their types
    for key in ["retries", "timeout", "endpoint"] {
        let handle = store.lookup(key)?;
        if handle.store_kind() == StoreKind::Specific {
            println!("  {} -> {}", key, handle.type_token());
        }
    }

    // Recover a value and change it through the store
    let handle = store.lookup("retries")?;
    recover_typed::<u32>(&handle)?.with_mut(|n| *n += 1)?;
    println!("retries is now {}", retries.get()?);

    // Asking for the wrong type is an error, not a misread
    match store.get::<String>("timeout") {
        Ok(value) => println!("This shouldn't happen: {:?}", value),
        Err(MapError::TypeMismatch { expected, found }) => {
            println!("timeout is a {}, not a {}", found, expected)
        }
        Err(e) => println!("Unexpected error: {}", e),
    }

    // Missing keys
    match store.lookup("proxy") {
        Ok(_) => println!("This shouldn't happen - proxy was never stored"),
        Err(MapError::KeyNotFound(key)) => println!("Correctly detected key ({}) is missing", key),
        Err(e) => println!("Unexpected error: {}", e),
    }

    // Duplicates are rejected by default
    if let Err(e) = store.insert_value("retries", 10u32) {
        println!("Second insert refused: {}", e);
    }

    store
        .get::<Endpoint>("endpoint")?
        .with(|ep| println!("Endpoint: {}:{}", ep.host, ep.port))?;

    Ok(())
}
