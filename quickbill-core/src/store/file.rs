use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use tracing::debug;
use uuid::Uuid;

use super::KeyValueStore;
use crate::error::StoreError;

/// Directory-backed store: one `<key>.json` document per key.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so a reader never sees a half-written document.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn ensure_dir(&self, key: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(key, e))?;

        #[cfg(unix)]
        {
            let _ = fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700));
        }

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        self.ensure_dir(key)?;

        let tmp_path = self
            .dir
            .join(format!(".{key}.json.tmp.{}", Uuid::new_v4().simple()));

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)
                .map_err(|e| StoreError::io(key, e))?;

            #[cfg(unix)]
            {
                let _ = file.set_permissions(fs::Permissions::from_mode(0o600));
            }

            file.write_all(value.as_bytes())
                .map_err(|e| StoreError::io(key, e))?;
            file.flush().map_err(|e| StoreError::io(key, e))?;
        }

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::io(key, e)
        })?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
