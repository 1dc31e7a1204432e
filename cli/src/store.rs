//! Persisted bearer-token storage.
//!
//! A single file holds the token string. Its presence means a previous
//! login succeeded; whether the token is still good is for the server to say.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const TOKEN_DIR: &str = ".mnstack";
const TOKEN_FILE: &str = "token";
#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("token store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Client-local home of the bearer token.
pub trait TokenStore: Send {
    /// Return the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the token cannot be written.
    fn save(&mut self, token: &str) -> Result<(), StoreError>;

    /// Discard the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the token cannot be removed.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Default location: `$HOME/.mnstack/token`, or `./.mnstack/token` without a home.
#[must_use]
pub fn default_token_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(TOKEN_DIR)
        .join(TOKEN_FILE)
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&mut self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(TOKEN_FILE_MODE);
        }
        let mut file = options.open(&self.path).map_err(|e| self.io_error(e))?;

        // `mode` only applies on creation; tighten a file left by an older run.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(TOKEN_FILE_MODE))
                .map_err(|e| self.io_error(e))?;
        }
        file.write_all(token.as_bytes()).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
