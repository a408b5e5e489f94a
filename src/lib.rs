//! # sovran-namedstore
//!
//! A named heterogeneous container built on checked type erasure.
//!
//! `sovran-namedstore` lets you register values of any type under string keys
//! and fetch them again later, without the container knowing the types ahead
//! of time. Every stored value sits behind a type-erased handle that remembers
//! the type it was created for, so asking for the wrong type is an error rather
//! than a misread.
//!
//! ## Key Features
//!
//! - **Checked recovery**: handles carry a [`TypeToken`] that is compared before
//!   any narrowing happens
//! - **Shared values**: data goes in through a [`Slot`], which the store shares
//!   with the caller instead of copying
//! - **Explicit duplicates**: inserting under a taken key is rejected unless the
//!   store is configured to overwrite
//! - **Thread-safe**: the store and every slot are guarded by `Mutex`
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_namedstore::{recover_typed, ErasedHandle, MapError, NamedStore, Slot, TypeToken};
//!
//! fn main() -> Result<(), MapError> {
//!     let store = NamedStore::new();
//!
//!     let one = Slot::new(1i32);
//!     let two = Slot::new(2.0f64);
//!     let three = Slot::new(3.0f32);
//!     store.insert("one", &one)?;
//!     store.insert("two", &two)?;
//!     store.insert("three", &three)?;
//!     assert_eq!(store.len()?, 3);
//!
//!     // Inspect a handle without knowing its type
//!     let handle = store.lookup("two")?;
//!     assert_eq!(handle.type_token(), TypeToken::of::<f64>());
//!
//!     // Recover it as the type it was stored with
//!     let value = recover_typed::<f64>(&handle)?;
//!     println!("two = {}", value.get()?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Changes Are Shared With the Caller
//!
//! ```rust
//! use sovran_namedstore::{MapError, NamedStore, Slot};
//!
//! fn main() -> Result<(), MapError> {
//!     let store = NamedStore::new();
//!     let one = Slot::new(1);
//!     store.insert("one", &one)?;
//!
//!     store.get::<i32>("one")?.with_mut(|n| *n += 1)?;
//!     assert_eq!(one.get()?, 2);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_namedstore::{MapError, NamedStore};
//!
//! let store = NamedStore::new();
//!
//! if let Err(e) = store.insert_value("config", vec!["setting1", "setting2"]) {
//!     eprintln!("Failed to store config: {}", e);
//!     return;
//! }
//!
//! // Wrong type
//! match store.get::<String>("config") {
//!     Ok(value) => println!("Config: {:?}", value),
//!     Err(MapError::TypeMismatch { expected, found }) => {
//!         println!("Config is a {}, not a {}", found, expected)
//!     }
//!     Err(e) => println!("Other error: {}", e),
//! }
//!
//! // Missing key
//! match store.lookup("settings") {
//!     Ok(_) => println!("Found settings"),
//!     Err(MapError::KeyNotFound(key)) => println!("Key ({}) doesn't exist", key),
//!     Err(e) => println!("Other error: {}", e),
//! }
//!
//! // Taken key
//! assert!(matches!(
//!     store.insert_value("config", 0u8),
//!     Err(MapError::DuplicateKey(_))
//! ));
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` for insertions and removals,
//! `trace` for lookups and recoveries, `warn` for rejected duplicates). It never
//! installs a subscriber.

mod config;
mod error;
mod handle;
mod slot;
mod store;
mod token;

pub use config::{DuplicatePolicy, StoreConfig};
pub use error::{MapError, Result};
pub use handle::{recover_typed, ErasedHandle, GenericHandle, SharedHandle, StoreKind, TypedHandle};
pub use slot::Slot;
pub use store::NamedStore;
pub use token::TypeToken;
