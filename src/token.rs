use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, OnceLock};

/// Runtime identity of a stored type
///
/// Tokens are handed out by a process-wide registry: the first time a type is
/// seen it receives the next registration index, and every later request for
/// the same type returns that index. Index `0` is reserved for
/// [`TypeToken::GENERIC`], so no real type can ever compare equal to it.
///
/// Equality and hashing only look at the index. The type name is kept for
/// diagnostics.
///
/// # Examples
///
/// ```
/// use sovran_namedstore::TypeToken;
///
/// assert_eq!(TypeToken::of::<i32>(), TypeToken::of::<i32>());
/// assert_ne!(TypeToken::of::<i32>(), TypeToken::of::<f64>());
/// assert_ne!(TypeToken::of::<i32>(), TypeToken::GENERIC);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TypeToken {
    index: u64,
    name: &'static str,
}

struct Registry {
    next: u64,
    tokens: HashMap<TypeId, TypeToken>,
}

fn registry() -> &'static Mutex<Registry> {
    static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        Mutex::new(Registry {
            next: 1,
            tokens: HashMap::new(),
        })
    })
}

impl TypeToken {
    /// The token of the untyped base handle
    pub const GENERIC: TypeToken = TypeToken {
        index: 0,
        name: "<generic>",
    };

    /// Returns the token registered for `T`, registering it on first use.
    pub fn of<T: 'static>() -> TypeToken {
        // The registry only ever grows under the lock, so a poisoned guard
        // still holds a consistent map.
        let mut registry = registry()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(token) = registry.tokens.get(&TypeId::of::<T>()) {
            return *token;
        }
        let token = TypeToken {
            index: registry.next,
            name: std::any::type_name::<T>(),
        };
        registry.next += 1;
        registry.tokens.insert(TypeId::of::<T>(), token);
        tracing::trace!(index = token.index, type_name = token.name, "registered type token");
        token
    }

    /// Registration index of this token
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Name of the type this token was registered for
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// True for the untyped base token
    pub fn is_generic(&self) -> bool {
        self.index == Self::GENERIC.index
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.index)
    }
}
