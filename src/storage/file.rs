//! Flat-file backing.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::storage::{StorageError, Store};

/// A [`Store`] backed by a single file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    /// Restrict the file to the owner (keystore files hold private keys).
    owner_only: bool,
}

impl FileStore {
    /// A world-readable file store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owner_only: false,
        }
    }

    /// A file store whose file is created with owner-only permissions on unix.
    pub fn owner_only(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owner_only: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            location: self.location(),
            source,
        }
    }
}

impl Store for FileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                location: self.location(),
                source: e,
            }),
        }
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        // Write the sibling first so a crash never leaves a truncated registry.
        let tmp = self.temp_path();
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        restrict_to_owner(&mut options, self.owner_only);

        let mut file = options.open(&tmp).map_err(|e| self.write_error(e))?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| self.write_error(e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| self.write_error(e))?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_to_owner(options: &mut fs::OpenOptions, owner_only: bool) {
    use std::os::unix::fs::OpenOptionsExt;
    if owner_only {
        options.mode(0o600);
    }
}

#[cfg(not(unix))]
fn restrict_to_owner(_options: &mut fs::OpenOptions, _owner_only: bool) {}
