/// What happens when a value is inserted under a key that is already present
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with `MapError::DuplicateKey` and keep the existing entry
    #[default]
    Reject,
    /// Replace the existing entry with the new handle
    Overwrite,
}

/// Settings for a `NamedStore`
///
/// # Examples
///
/// ```
/// use sovran_namedstore::{DuplicatePolicy, NamedStore, StoreConfig};
///
/// let config = StoreConfig::default().with_duplicate_policy(DuplicatePolicy::Overwrite);
/// let store = NamedStore::with_config(config);
/// assert_eq!(store.config().duplicate_policy, DuplicatePolicy::Overwrite);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub duplicate_policy: DuplicatePolicy,
}

impl StoreConfig {
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
