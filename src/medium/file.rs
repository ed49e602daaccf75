use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::MediumError;
use crate::medium::KeyValueMedium;

/// Directory-backed medium storing each key as `<dir>/<key>.json`.
///
/// Writes land in `<key>.json.tmp` first and are renamed over the target, so
/// a crash mid-write leaves either the old value or the new one on disk.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Open the medium, creating `dir` if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, MediumError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| classify(dir.display().to_string(), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, MediumError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(MediumError::Io {
                key: key.to_string(),
                source: io::Error::new(ErrorKind::InvalidInput, "key is not a plain file name"),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn classify(key: String, source: io::Error) -> MediumError {
    match source.kind() {
        ErrorKind::StorageFull | ErrorKind::QuotaExceeded | ErrorKind::FileTooLarge => {
            MediumError::CapacityExceeded { key }
        }
        _ => MediumError::Io { key, source },
    }
}

impl KeyValueMedium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(classify(key.to_string(), e)),
        };
        String::from_utf8(bytes).map(Some).map_err(|_| MediumError::Undecodable {
            key: key.to_string(),
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");

        if let Err(e) = fs::write(&temp_path, value) {
            let _ = fs::remove_file(&temp_path);
            return Err(classify(key.to_string(), e));
        }
        fs::rename(&temp_path, &path).map_err(|e| classify(key.to_string(), e))?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), MediumError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(classify(key.to_string(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut medium = FileMedium::open(dir.path().join("data")).unwrap();

        assert_eq!(medium.get("recipes").unwrap(), None);
        medium.set("recipes", "[]").unwrap();
        assert_eq!(medium.get("recipes").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data/recipes.json").exists());
        assert!(!dir.path().join("data/recipes.json.tmp").exists());

        medium.remove("recipes").unwrap();
        medium.remove("recipes").unwrap();
        assert_eq!(medium.get("recipes").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        FileMedium::open(dir.path())
            .unwrap()
            .set("draft", "{\"title\":\"Tea\"}")
            .unwrap();

        let reopened = FileMedium::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("draft").unwrap().as_deref(),
            Some("{\"title\":\"Tea\"}")
        );
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let medium = FileMedium::open(dir.path()).unwrap();
        assert!(medium.path_for("../escape").is_err());
        assert!(medium.path_for("").is_err());
        assert!(medium.path_for(".hidden").is_err());
        assert!(medium.path_for("recipes").is_ok());
    }

    #[test]
    fn test_invalid_utf8_is_undecodable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("recipes.json"), [0xff, 0xfe, 0x5b]).unwrap();

        let medium = FileMedium::open(dir.path()).unwrap();
        assert!(matches!(
            medium.get("recipes"),
            Err(MediumError::Undecodable { ref key }) if key == "recipes"
        ));
    }

    #[test]
    fn test_classify_capacity_errors() {
        let full = classify("k".to_string(), io::Error::from(ErrorKind::StorageFull));
        assert!(matches!(full, MediumError::CapacityExceeded { .. }));

        let quota = classify("k".to_string(), io::Error::from(ErrorKind::QuotaExceeded));
        assert!(matches!(quota, MediumError::CapacityExceeded { .. }));

        let denied = classify("k".to_string(), io::Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(denied, MediumError::Io { .. }));
    }
}
