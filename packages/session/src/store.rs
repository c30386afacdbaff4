//! On-disk persistence for the access/refresh token pair.
//!
//! One TOML file holds both tokens; they are written together at login
//! and removed together at logout or demotion. A corrupt or unreadable
//! file is treated as no session rather than an error.

use std::path::{Path, PathBuf};

use district_desk_api_models::TokenPair;

use crate::SessionError;

/// Environment variable overriding the token file location.
pub const SESSION_FILE_ENV: &str = "DISTRICT_DESK_SESSION_FILE";

/// Token file path used when [`SESSION_FILE_ENV`] is unset.
pub const DEFAULT_SESSION_FILE: &str = "data/session.toml";

/// Reads and writes the persisted token pair.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store from `DISTRICT_DESK_SESSION_FILE`, falling back
    /// to [`DEFAULT_SESSION_FILE`].
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var(SESSION_FILE_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);
        Self::new(path)
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted pair, if a readable and well-formed token
    /// file exists.
    #[must_use]
    pub fn load(&self) -> Option<TokenPair> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match toml::from_str(&contents) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                log::warn!("Ignoring malformed token file {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Persists both tokens, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the file cannot be written.
    pub fn save(&self, tokens: &TokenPair) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string(tokens)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Removes the token file. Missing files are not an error; other
    /// failures are logged and swallowed so logout can never fail.
    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            log::warn!("Failed to remove token file {}: {e}", self.path.display());
        }
    }
}
