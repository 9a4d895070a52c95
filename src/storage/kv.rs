use super::error::StorageError;

/// String-keyed store of serialized values that survives restarts.
///
/// Writes are synchronous: once `set` returns `Ok`, a following `get` of the
/// same key observes the new value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`. Either the new value is stored or the
    /// old one is left untouched.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Write several keys as one unit: all of them or none.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        (**self).set_many(entries)
    }
}
