use std::collections::BTreeMap;

use crate::error::MediumError;
use crate::medium::KeyValueMedium;

/// In-memory medium with an optional byte quota.
///
/// Nothing survives the process. The quota counts the bytes of every key
/// and value held; a write that would exceed it fails with
/// [`MediumError::CapacityExceeded`] and leaves the previous value in place.
#[derive(Debug, Default, Clone)]
pub struct MemoryMedium {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn set_quota(&mut self, quota_bytes: Option<usize>) {
        self.quota_bytes = quota_bytes;
    }

    /// Bytes currently held, keys included
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueMedium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        if let Some(quota) = self.quota_bytes {
            let replaced = self.entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(MediumError::CapacityExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), MediumError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut medium = MemoryMedium::new();
        assert_eq!(medium.get("k").unwrap(), None);

        medium.set("k", "v").unwrap();
        assert_eq!(medium.get("k").unwrap().as_deref(), Some("v"));

        medium.remove("k").unwrap();
        medium.remove("k").unwrap();
        assert!(medium.is_empty());
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let mut medium = MemoryMedium::with_quota(10);
        medium.set("k", "12345").unwrap();
        assert_eq!(medium.used_bytes(), 6);

        let err = medium.set("k", "1234567890").unwrap_err();
        assert!(matches!(err, MediumError::CapacityExceeded { .. }));
        assert_eq!(medium.get("k").unwrap().as_deref(), Some("12345"));
    }

    #[test]
    fn test_quota_counts_replaced_value_as_freed() {
        let mut medium = MemoryMedium::with_quota(10);
        medium.set("k", "123456789").unwrap();
        medium.set("k", "987654321").unwrap();
        assert_eq!(medium.used_bytes(), 10);
    }
}
