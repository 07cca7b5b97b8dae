//! On-disk persistence for the console session.
//!
//! The console session itself is a plain core object; the CLI persists it
//! between invocations so `login` carries over to later commands. Missing
//! or corrupt state degrades to a logged-out session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use regdesk_core::ConsoleSession;

/// Environment variable overriding the session file location.
pub const SESSION_FILE_ENV: &str = "REGDESK_SESSION_FILE";

/// Loads and saves the console session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default platform location, honoring the env override.
    pub fn detect() -> Self {
        let path = std::env::var_os(SESSION_FILE_ENV).map_or_else(default_path, PathBuf::from);
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted session; anything unreadable is logged out.
    pub fn load(&self) -> ConsoleSession {
        let Ok(data) = std::fs::read(&self.path) else {
            return ConsoleSession::new();
        };
        serde_json::from_slice(&data).unwrap_or_else(|_| ConsoleSession::new())
    }

    pub fn save(&self, session: &ConsoleSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut payload = serde_json::to_vec_pretty(session)?;
        payload.push(b'\n');
        std::fs::write(&self.path, payload)
            .with_context(|| format!("writing {}", self.path.display()))
    }

    /// Remove the persisted session entirely.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("regdesk")
        .join("session.json")
}
