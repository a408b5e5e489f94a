use crate::error::MapError;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A shared, lock-guarded cell holding a caller's value
///
/// A `Slot` is how data enters a [`NamedStore`](crate::NamedStore). Cloning a
/// slot does not clone the value: every clone refers to the same datum, so a
/// change made through a slot recovered from the store is visible through the
/// caller's original slot, and the other way around.
///
/// # Examples
///
/// ```
/// use sovran_namedstore::{MapError, Slot};
///
/// let counter = Slot::new(1);
/// let alias = counter.clone();
///
/// alias.with_mut(|n| *n += 1)?;
/// assert_eq!(counter.get()?, 2);
/// # Ok::<(), MapError>(())
/// ```
pub struct Slot<T> {
    cell: Arc<Mutex<T>>,
}

impl<T> Slot<T> {
    /// Creates a new slot owning `value`
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(Mutex::new(value)),
        }
    }

    /// Runs a closure with read access to the value
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn with<F, R>(&self, f: F) -> Result<R, MapError>
    where
        F: FnOnce(&T) -> R,
    {
        let value = self.cell.lock().map_err(|_| MapError::LockError)?;
        Ok(f(&value))
    }

    /// Runs a closure with write access to the value
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn with_mut<F, R>(&self, f: F) -> Result<R, MapError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut value = self.cell.lock().map_err(|_| MapError::LockError)?;
        Ok(f(&mut value))
    }

    /// Returns a clone of the current value
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn get(&self) -> Result<T, MapError>
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Replaces the value, returning the previous one
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn set(&self, value: T) -> Result<T, MapError> {
        self.with_mut(|current| std::mem::replace(current, value))
    }

    /// True if both slots refer to the same datum
    pub fn ptr_eq(&self, other: &Slot<T>) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// Number of slots (and handles) currently sharing this datum
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.cell)
    }
}

impl<T: Send + 'static> Slot<T> {
    pub(crate) fn erased(&self) -> Arc<dyn Any + Send + Sync> {
        self.cell.clone()
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.cell.try_lock() {
            Ok(value) => f.debug_tuple("Slot").field(&*value).finish(),
            Err(_) => f.write_str("Slot(<locked>)"),
        }
    }
}
