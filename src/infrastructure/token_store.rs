use crate::application::TokenStore;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// File-backed token storage: one file per namespaced key, kept under a
/// directory chosen at startup.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Keys like "@termgram/token" are not valid filenames; map every
    /// non-alphanumeric character to '_' to get a stable file name.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

impl TokenStore for FileTokenStore {
    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            return Err(e.to_string());
        }
        fs::write(self.path_for(key), value).map_err(|e| e.to_string())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            // Removing an absent key is not a failure.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::TOKEN_STORAGE_KEY;

    #[test]
    fn test_set_then_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.set(TOKEN_STORAGE_KEY, "t1").unwrap();
        let path = store.path_for(TOKEN_STORAGE_KEY);
        assert_eq!(fs::read_to_string(&path).unwrap(), "t1");

        store.remove(TOKEN_STORAGE_KEY).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_set_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested/data"));

        store.set(TOKEN_STORAGE_KEY, "t1").unwrap();
        assert!(store.path_for(TOKEN_STORAGE_KEY).exists());
    }

    #[test]
    fn test_remove_of_absent_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        assert!(store.remove("@termgram/never-set").is_ok());
    }

    #[test]
    fn test_key_is_sanitized_into_a_flat_filename() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.set("@termgram/token", "t1").unwrap();
        // The '/' in the key must not create a subdirectory.
        assert!(dir.path().join("_termgram_token").exists());
    }
}
