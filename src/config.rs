//! # Configuration Module
//!
//! Resolves where Platter keeps its catalogue and who is rating.
//!
//! ## Data Storage
//!
//! The database lives in the platform-standard data directory:
//! - Linux: `~/.local/share/platter/platter.db`
//! - macOS: `~/Library/Application Support/platter/platter.db`
//! - Windows: `%APPDATA%\platter\platter.db`
//!
//! `PLATTER_DB` (or `--db`) points somewhere else; `PLATTER_USER` (or
//! `--user`) sets whose ratings are written.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "PLATTER_DB";
/// Environment variable naming the rating user.
pub const USER_ENV: &str = "PLATTER_USER";
/// Rating owner when none is configured.
pub const DEFAULT_USER: &str = "local";

const DB_FILE_NAME: &str = "platter.db";

/// Returns the platform-appropriate database file path, creating the
/// `platter` data directory if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The platter subdirectory cannot be created due to permissions
///
/// # Examples
///
/// ```no_run
/// use platter::config::get_db_path;
///
/// let db_path = get_db_path()?;
/// println!("Database location: {}", db_path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(DB_FILE_NAME))
}

/// Returns the platter data directory, creating it if needed.
///
/// # Errors
///
/// Fails when the system data directory is unknown or not writable.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Set {DB_ENV} to choose a database location."
        )
    })?;

    platter_dir_in(&data_dir)
}

/// `<base>/platter`, created if missing.
fn platter_dir_in(base: &Path) -> Result<PathBuf> {
    let platter_dir = base.join("platter");
    fs::create_dir_all(&platter_dir).with_context(|| {
        format!(
            "Failed to create Platter data directory at {}. Please check file permissions.",
            platter_dir.display()
        )
    })?;

    Ok(platter_dir)
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Path to the database file
    pub db_path: PathBuf,
    /// Owner of ratings written in this session
    pub user: String,
}

impl RuntimeConfig {
    /// Resolve the configuration. Explicit values win, then the platform
    /// defaults. (The CLI feeds `PLATTER_DB`/`PLATTER_USER` in through clap.)
    ///
    /// # Errors
    ///
    /// Fails when no database path was given and the default location cannot
    /// be created.
    pub fn resolve(db_path: Option<PathBuf>, user: Option<String>) -> Result<Self> {
        let db_path = match db_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory {}", parent.display())
                    })?;
                }
                path
            }
            None => get_db_path()?,
        };

        let user = user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        Ok(Self { db_path, user })
    }
}
