use crate::error::MapError;
use crate::slot::Slot;
use crate::token::TypeToken;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Coarse discriminant between the base handle and typed handles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// The unspecialized base case; never carries typed data
    Generic,
    /// A handle created for a concrete type
    Specific,
}

/// The type-erased view every stored handle exposes
///
/// An `ErasedHandle` reports which type it was created for and hands out an
/// untyped reference to its datum. It never exposes the typed value itself:
/// that goes through [`recover_typed`], which checks the token first.
pub trait ErasedHandle: Any + Send + Sync {
    /// Identity token of the stored type
    fn type_token(&self) -> TypeToken;

    /// The attached datum with no type information, or `None` if nothing
    /// has been attached
    fn untyped(&self) -> Option<Arc<dyn Any + Send + Sync>>;

    /// Whether this handle is the generic base case or a typed handle
    fn store_kind(&self) -> StoreKind;

    /// Concrete handle as `Any`, used for narrowing
    fn as_any(&self) -> &dyn Any;
}

/// Shared-ownership handle as held by a `NamedStore` and returned from lookups
pub type SharedHandle = Arc<dyn ErasedHandle>;

impl dyn ErasedHandle {
    /// Returns true if this handle was created for type `T`
    pub fn is<T: 'static>(&self) -> bool {
        self.type_token() == TypeToken::of::<T>()
    }
}

impl fmt::Debug for dyn ErasedHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ErasedHandle")
            .field("kind", &self.store_kind())
            .field("token", &self.type_token())
            .field("attached", &self.untyped().is_some())
            .finish()
    }
}

/// The unspecialized base handle
///
/// It reports [`TypeToken::GENERIC`] and [`StoreKind::Generic`]. It can hold
/// an untyped reference, but [`recover_typed`] always refuses it.
#[derive(Default)]
pub struct GenericHandle {
    reference: Option<Arc<dyn Any + Send + Sync>>,
}

impl GenericHandle {
    pub fn new() -> Self {
        Self { reference: None }
    }

    pub fn with_reference(reference: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            reference: Some(reference),
        }
    }
}

impl ErasedHandle for GenericHandle {
    fn type_token(&self) -> TypeToken {
        TypeToken::GENERIC
    }

    fn untyped(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.reference.clone()
    }

    fn store_kind(&self) -> StoreKind {
        StoreKind::Generic
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A handle created for values of type `T`
///
/// The token is fixed to `T` when the handle is built. The datum is attached
/// afterwards through [`attach`](TypedHandle::attach), before the handle is
/// shared.
///
/// # Examples
///
/// ```
/// use sovran_namedstore::{ErasedHandle, MapError, Slot, StoreKind, TypeToken, TypedHandle};
///
/// let value = Slot::new(3.5f64);
/// let mut handle = TypedHandle::<f64>::new();
/// handle.attach(&value);
///
/// assert_eq!(handle.type_token(), TypeToken::of::<f64>());
/// assert_eq!(handle.store_kind(), StoreKind::Specific);
/// assert_eq!(handle.typed_value().map(|slot| slot.get()).transpose()?, Some(3.5));
/// # Ok::<(), MapError>(())
/// ```
pub struct TypedHandle<T> {
    token: TypeToken,
    slot: Option<Slot<T>>,
}

impl<T: Send + 'static> TypedHandle<T> {
    /// Creates a handle for `T` with no datum attached
    pub fn new() -> Self {
        Self {
            token: TypeToken::of::<T>(),
            slot: None,
        }
    }

    /// Attaches `slot` as this handle's datum, replacing any previous one
    pub fn attach(&mut self, slot: &Slot<T>) {
        self.slot = Some(slot.clone());
    }

    /// The attached slot, already typed as `T`
    pub fn typed_value(&self) -> Option<&Slot<T>> {
        self.slot.as_ref()
    }
}

impl<T: Send + 'static> Default for TypedHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> ErasedHandle for TypedHandle<T> {
    fn type_token(&self) -> TypeToken {
        self.token
    }

    fn untyped(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.slot.as_ref().map(Slot::erased)
    }

    fn store_kind(&self) -> StoreKind {
        StoreKind::Specific
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> fmt::Debug for TypedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TypedHandle")
            .field("token", &self.token)
            .field("attached", &self.slot.is_some())
            .finish()
    }
}

/// Recovers the typed slot behind an erased handle
///
/// The checks run in order: a generic handle is refused with
/// `GenericHandleMisuse`, a handle with nothing attached with `NullHandle`,
/// and a handle whose token is not `T`'s with `TypeMismatch`. Only then is the
/// handle narrowed to `TypedHandle<T>`. The returned slot aliases the stored
/// datum.
///
/// # Examples
///
/// ```
/// use sovran_namedstore::{recover_typed, MapError, NamedStore, Slot};
///
/// let store = NamedStore::new();
/// let one = Slot::new(1i32);
/// store.insert("one", &one)?;
///
/// let handle = store.lookup("one")?;
/// let recovered = recover_typed::<i32>(&handle)?;
/// recovered.with_mut(|n| *n += 1)?;
/// assert_eq!(one.get()?, 2);
///
/// assert!(matches!(
///     recover_typed::<f64>(&handle),
///     Err(MapError::TypeMismatch { .. })
/// ));
/// # Ok::<(), MapError>(())
/// ```
pub fn recover_typed<T: Send + 'static>(handle: &SharedHandle) -> Result<Slot<T>, MapError> {
    if handle.store_kind() == StoreKind::Generic {
        return Err(MapError::GenericHandleMisuse);
    }
    if handle.untyped().is_none() {
        return Err(MapError::NullHandle);
    }

    let expected = TypeToken::of::<T>();
    let found = handle.type_token();
    if found != expected {
        tracing::trace!(%expected, %found, "refused typed recovery");
        return Err(MapError::TypeMismatch { expected, found });
    }

    // A handle type outside this crate could report a matching token without
    // being a TypedHandle<T>.
    handle
        .as_any()
        .downcast_ref::<TypedHandle<T>>()
        .and_then(TypedHandle::typed_value)
        .cloned()
        .ok_or(MapError::TypeMismatch { expected, found })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared<T: Send + 'static>(value: &Slot<T>) -> SharedHandle {
        let mut handle = TypedHandle::<T>::new();
        handle.attach(value);
        Arc::new(handle)
    }

    struct Impostor;

    impl ErasedHandle for Impostor {
        fn type_token(&self) -> TypeToken {
            TypeToken::of::<i32>()
        }

        fn untyped(&self) -> Option<Arc<dyn Any + Send + Sync>> {
            Some(Arc::new(0u8))
        }

        fn store_kind(&self) -> StoreKind {
            StoreKind::Specific
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_typed_handle_reports_its_type() {
        let handle = TypedHandle::<String>::new();
        assert_eq!(handle.type_token(), TypeToken::of::<String>());
        assert_eq!(handle.store_kind(), StoreKind::Specific);
        assert!(handle.typed_value().is_none());
        assert!(handle.untyped().is_none());
    }

    #[test]
    fn test_generic_handle_reports_generic() {
        let handle = GenericHandle::new();
        assert_eq!(handle.type_token(), TypeToken::GENERIC);
        assert_eq!(handle.store_kind(), StoreKind::Generic);
        assert!(handle.untyped().is_none());
    }

    #[test]
    fn test_recover_round_trip() -> Result<(), MapError> {
        let value = Slot::new(vec!["a".to_string()]);
        let handle = shared(&value);

        let recovered = recover_typed::<Vec<String>>(&handle)?;
        assert!(recovered.ptr_eq(&value));
        assert_eq!(recovered.get()?, vec!["a".to_string()]);
        assert!(handle.is::<Vec<String>>());
        Ok(())
    }

    #[test]
    fn test_recover_wrong_type() {
        let handle = shared(&Slot::new(1i32));

        match recover_typed::<u32>(&handle) {
            Err(MapError::TypeMismatch { expected, found }) => {
                assert_eq!(expected, TypeToken::of::<u32>());
                assert_eq!(found, TypeToken::of::<i32>());
            }
            other => panic!("Should have gotten type mismatch error, got {:?}", other),
        }
    }

    #[test]
    fn test_recover_generic_handle() {
        let handle: SharedHandle = Arc::new(GenericHandle::with_reference(Arc::new(5i32)));
        assert!(matches!(
            recover_typed::<i32>(&handle),
            Err(MapError::GenericHandleMisuse)
        ));
    }

    #[test]
    fn test_recover_unattached_handle() {
        let handle: SharedHandle = Arc::new(TypedHandle::<i32>::new());
        assert!(matches!(
            recover_typed::<i32>(&handle),
            Err(MapError::NullHandle)
        ));
    }

    #[test]
    fn test_recover_refuses_foreign_handle_with_matching_token() {
        let handle: SharedHandle = Arc::new(Impostor);
        assert!(matches!(
            recover_typed::<i32>(&handle),
            Err(MapError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_untyped_reference_points_at_datum() {
        let value = Slot::new(9i64);
        let handle = shared(&value);

        let raw = handle.untyped().expect("attached");
        let cell = raw
            .downcast::<std::sync::Mutex<i64>>()
            .expect("cell of the stored type");
        *cell.lock().unwrap() = 10;

        assert_eq!(value.get().unwrap(), 10);
    }

    #[test]
    fn test_attach_replaces_datum() -> Result<(), MapError> {
        let first = Slot::new(1u8);
        let second = Slot::new(2u8);

        let mut handle = TypedHandle::<u8>::new();
        handle.attach(&first);
        handle.attach(&second);

        let slot = handle.typed_value().expect("attached");
        assert!(slot.ptr_eq(&second));
        assert_eq!(first.share_count(), 1);
        Ok(())
    }

    #[test]
    fn test_debug_for_erased_handle() {
        let handle = shared(&Slot::new(true));
        let text = format!("{:?}", handle);
        assert!(text.contains("Specific"));
        assert!(text.contains("bool"));
    }
}
