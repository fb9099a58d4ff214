//! Storage configuration and path management for Shortlist.
//!
//! `StorageConfig` owns every file path Shortlist writes. Production code uses
//! `StorageConfig::default()`; tests inject a temp directory with
//! `StorageConfig::with_root()`.

use std::env;
use std::path::{Path, PathBuf};

/// Overrides the data root (useful for running several profiles side by side).
pub const HOME_ENV: &str = "SHORTLIST_HOME";

/// Central configuration for all Shortlist storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all Shortlist data (default: ~/.shortlist)
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        if let Ok(root) = env::var(HOME_ENV) {
            if !root.trim().is_empty() {
                return Self::with_root(PathBuf::from(root));
            }
        }
        let root = dirs::home_dir()
            .map(|home| home.join(".shortlist"))
            .unwrap_or_else(|| env::temp_dir().join(".shortlist"));
        Self { root }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Files
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to items.json (the comparison list, tombstones included).
    pub fn items_file(&self) -> PathBuf {
        self.root.join("items.json")
    }

    /// Path to identity.json (anonymous browser identity).
    pub fn identity_file(&self) -> PathBuf {
        self.root.join("identity.json")
    }

    /// Path to last-session.json (cache of the last submitted session).
    pub fn last_session_file(&self) -> PathBuf {
        self.root.join("last-session.json")
    }

    /// Path to config.json (mode and endpoint preferences).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Directories
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Ensures the root directory and standard subdirectories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs_err::create_dir_all(&self.root)?;
        fs_err::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
