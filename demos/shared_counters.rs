//! Shares one store between several components and worker threads.
//!
//! Run with: cargo run --example shared_counters

use sovran_namedstore::{DuplicatePolicy, MapError, NamedStore, StoreConfig};
use std::collections::HashMap;
use std::thread;
use tracing_subscriber::EnvFilter;

struct VisitTracker {
    store: NamedStore,
}

impl VisitTracker {
    fn new(store: NamedStore) -> Result<Self, MapError> {
        if !store.contains_key("visits")? {
            store.insert_value("visits", HashMap::<String, u64>::new())?;
        }
        Ok(Self { store })
    }

    fn record(&self, page: &str) -> Result<(), MapError> {
        self.store
            .get::<HashMap<String, u64>>("visits")?
            .with_mut(|visits| *visits.entry(page.to_string()).or_insert(0) += 1)
    }

    fn total(&self) -> Result<u64, MapError> {
        self.store
            .get::<HashMap<String, u64>>("visits")?
            .with(|visits| visits.values().sum())
    }
}

fn main() -> Result<(), MapError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Settings get replaced while running, so let later inserts win
    let store = NamedStore::with_config(
        StoreConfig::default().with_duplicate_policy(DuplicatePolicy::Overwrite),
    );
    store.insert_value("site_name", "example.org".to_string())?;

    let tracker = VisitTracker::new(store.clone())?;

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let tracker = VisitTracker::new(store.clone());
            thread::spawn(move || -> Result<(), MapError> {
                let tracker = tracker?;
                for i in 0..25 {
                    let page = if i % 2 == 0 { "/home" } else { "/about" };
                    tracker.record(page)?;
                }
                println!("worker {} done", worker);
                Ok(())
            })
        })
        .collect();

    for worker in workers {
        if let Ok(result) = worker.join() {
            result?;
        }
    }

    store.insert_value("site_name", "example.com".to_string())?;

    println!(
        "{} served {} visits",
        store.get::<String>("site_name")?.get()?,
        tracker.total()?
    );

    Ok(())
}
