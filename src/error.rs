use crate::token::TypeToken;
use thiserror::Error;

/// Errors that can occur when using a `NamedStore` or its handles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Failed to acquire a lock on the store or on a slot
    #[error("Failed to acquire lock")]
    LockError,

    /// The requested key was not found
    #[error("Key not found in store: {0}")]
    KeyNotFound(String),

    /// A value was inserted under a key that is already taken
    #[error("Key already present in store: {0}")]
    DuplicateKey(String),

    /// The handle carries no datum
    #[error("Handle has no attached value")]
    NullHandle,

    /// The unspecialized base handle was used for typed data access
    #[error("Generic handle cannot be used for data access")]
    GenericHandleMisuse,

    /// Attempted to access a value with a type that doesn't match what was stored
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: TypeToken,
        found: TypeToken,
    },
}

pub type Result<T> = std::result::Result<T, MapError>;
