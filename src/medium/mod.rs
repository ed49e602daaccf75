//! Persistent key-value media the recipe store writes through.
//!
//! A medium maps string keys to string values. Writes may fail either
//! because the medium is full ([`MediumError::CapacityExceeded`]) or for any
//! other reason ([`MediumError::Io`]); callers treat the two differently.
//! A read of bytes that are not UTF-8 fails with
//! [`MediumError::Undecodable`], which stores treat as corrupted data.

mod file;
mod memory;

pub use self::file::FileMedium;
pub use self::memory::MemoryMedium;

use crate::error::MediumError;

pub trait KeyValueMedium {
    /// Value stored under `key`, or `None` if nothing is stored
    fn get(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Delete `key`. Deleting a missing key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), MediumError>;
}

impl<M: KeyValueMedium + ?Sized> KeyValueMedium for Box<M> {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), MediumError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_medium_delegates() {
        let mut medium: Box<dyn KeyValueMedium> = Box::new(MemoryMedium::new());
        medium.set("k", "v").unwrap();
        assert_eq!(medium.get("k").unwrap().as_deref(), Some("v"));
        medium.remove("k").unwrap();
        assert_eq!(medium.get("k").unwrap(), None);
    }
}
