use crate::config::{DuplicatePolicy, StoreConfig};
use crate::error::MapError;
use crate::handle::{recover_typed, SharedHandle, TypedHandle};
use crate::slot::Slot;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A named heterogeneous container
///
/// `NamedStore` maps string keys to type-erased handles. Each handle remembers
/// the type it was created for, so a value can only be recovered as that type.
/// Values are shared with the caller through [`Slot`]s: the store keeps a
/// share of the slot it was given, never a copy of the value.
///
/// Cloning a `NamedStore` yields another view of the same entries.
///
/// # Examples
///
/// ```
/// use sovran_namedstore::{MapError, NamedStore, Slot};
///
/// let store = NamedStore::new();
///
/// let one = Slot::new(1i32);
/// let two = Slot::new(2.0f64);
/// store.insert("one", &one)?;
/// store.insert("two", &two)?;
/// assert_eq!(store.len()?, 2);
///
/// assert_eq!(store.get::<f64>("two")?.get()?, 2.0);
/// assert!(matches!(store.get::<f64>("one"), Err(MapError::TypeMismatch { .. })));
/// assert!(matches!(store.lookup("three"), Err(MapError::KeyNotFound(_))));
/// # Ok::<(), MapError>(())
/// ```
#[derive(Clone, Debug)]
pub struct NamedStore {
    items: Arc<Mutex<HashMap<String, SharedHandle>>>,
    config: StoreConfig,
}

impl NamedStore {
    /// Creates a new, empty store that rejects duplicate keys
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a new, empty store with the given configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            items: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Records `value` under `key`
    ///
    /// A `TypedHandle<T>` is built, the slot is attached to it, and the handle
    /// is stored. The store shares the slot with the caller; changes made
    /// through either side are visible to both.
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::DuplicateKey` if `key` is taken and the store
    ///   rejects duplicates
    pub fn insert<T: Send + 'static>(
        &self,
        key: impl Into<String>,
        value: &Slot<T>,
    ) -> Result<(), MapError> {
        let mut handle = TypedHandle::<T>::new();
        handle.attach(value);
        self.publish(key.into(), Arc::new(handle))
    }

    /// Moves `value` into a new slot, records it under `key`, and returns the
    /// slot so the caller keeps access to it
    ///
    /// # Errors
    ///
    /// Same as [`insert`](NamedStore::insert).
    pub fn insert_value<T: Send + 'static>(
        &self,
        key: impl Into<String>,
        value: T,
    ) -> Result<Slot<T>, MapError> {
        let slot = Slot::new(value);
        self.insert(key, &slot)?;
        Ok(slot)
    }

    fn publish(&self, key: String, handle: SharedHandle) -> Result<(), MapError> {
        let token = handle.type_token();
        let mut items = self.items.lock().map_err(|_| MapError::LockError)?;
        match items.entry(key) {
            Entry::Vacant(entry) => {
                tracing::debug!(key = %entry.key(), %token, "inserted handle");
                entry.insert(handle);
                Ok(())
            }
            Entry::Occupied(mut entry) => match self.config.duplicate_policy {
                DuplicatePolicy::Reject => {
                    tracing::warn!(key = %entry.key(), %token, "rejected duplicate key");
                    Err(MapError::DuplicateKey(entry.key().clone()))
                }
                DuplicatePolicy::Overwrite => {
                    let previous = entry.insert(handle);
                    tracing::debug!(
                        key = %entry.key(),
                        previous = %previous.type_token(),
                        %token,
                        "overwrote handle"
                    );
                    Ok(())
                }
            },
        }
    }

    /// Returns the erased handle stored under `key`
    ///
    /// The handle is shared with the store and stays valid after the entry is
    /// removed.
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    pub fn lookup(&self, key: &str) -> Result<SharedHandle, MapError> {
        let items = self.items.lock().map_err(|_| MapError::LockError)?;
        let handle = items
            .get(key)
            .cloned()
            .ok_or_else(|| MapError::KeyNotFound(key.to_string()))?;
        tracing::trace!(key, token = %handle.type_token(), "looked up handle");
        Ok(handle)
    }

    /// Looks up `key` and recovers its value as `T`
    ///
    /// # Errors
    ///
    /// Any error of [`lookup`](NamedStore::lookup) or
    /// [`recover_typed`](crate::recover_typed).
    pub fn get<T: Send + 'static>(&self, key: &str) -> Result<Slot<T>, MapError> {
        let handle = self.lookup(key)?;
        recover_typed::<T>(&handle)
    }

    /// Removes the entry under `key`
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the key was present and removed, `Ok(false)` if not present.
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn remove(&self, key: &str) -> Result<bool, MapError> {
        let mut items = self.items.lock().map_err(|_| MapError::LockError)?;
        let removed = items.remove(key);
        if let Some(handle) = &removed {
            tracing::debug!(key, token = %handle.type_token(), "removed handle");
        }
        Ok(removed.is_some())
    }

    /// Returns true if the store contains the specified key
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn contains_key(&self, key: &str) -> Result<bool, MapError> {
        let items = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(items.contains_key(key))
    }

    /// Returns the number of entries in the store
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn len(&self) -> Result<usize, MapError> {
        let items = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(items.len())
    }

    /// Returns true if the store contains no entries
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn is_empty(&self) -> Result<bool, MapError> {
        let items = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(items.is_empty())
    }
}

impl Default for NamedStore {
    fn default() -> Self {
        Self::new()
    }
}
