// Bearer token storage.
// Persists the API token on disk with atomic writes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use tracing::warn;

use crate::error::{JothidaError, Result};

/// File-backed token store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store rooted at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location.
    pub fn default_location() -> Result<Self> {
        super::paths::token_path()
            .map(Self::new)
            .ok_or_else(|| JothidaError::Config("no home directory for token storage".to_string()))
    }

    /// Token at the default location, or `None` when it cannot be read.
    ///
    /// Requests then go out unauthenticated instead of failing.
    pub fn default_token() -> Option<String> {
        Self::token_from(Self::default_location())
    }

    fn token_from(store: Result<Self>) -> Option<String> {
        match store.and_then(|store| store.load()) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "token unavailable, continuing without it");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored token, if any. Blank files count as no token.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let token = fs::read_to_string(&self.path)?;
        let token = token.trim();
        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token.to_string()))
        }
    }

    /// Save a token, replacing any existing one.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically via temp file
        let temp_path = self.temp_path();
        let written = write_private(&temp_path, token.trim().as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if written.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        written?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("token");
        self.path.with_file_name(format!(".{name}.{}.tmp", process::id()))
    }

    /// Remove the stored token.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Create a fresh file readable only by the owner.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    // A leftover from a crashed save would make create_new fail
    if path.exists() {
        fs::remove_file(path)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
