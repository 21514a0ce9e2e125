//! Directory layout of the resources folder.
//!
//! By default everything lives in a `Resources` folder relative to the
//! working directory:
//!
//! ```text
//! Resources/
//!  ├─ config.json        {"SavePath": "..."}
//!  ├─ credentials.json   {"Username": "..."}
//!  └─ lockfile.txt       transient, exists only inside get_lockfile_content
//! ```
//!
//! The layout is injected into [`LocalStorageService`](super::local::LocalStorageService)
//! rather than hard-coded, so tests can point it at an isolated temp
//! directory.  It can also be read from a TOML file:
//!
//! ```toml
//! resources_dir = "Resources"
//! configuration_file = "config.json"
//! credentials_file = "credentials.json"
//! lockfile = "lockfile.txt"
//! ```
//!
//! Every key is optional; absent keys keep their default.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_RESOURCES_DIR: &str = "Resources";
pub const DEFAULT_CONFIGURATION_FILE: &str = "config.json";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_LOCKFILE: &str = "lockfile.txt";

/// Error type for loading a layout file.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing layout at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse layout TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Location of the resources folder and the names of the files inside it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StorageLayout {
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,
    #[serde(default = "default_configuration_file")]
    pub configuration_file: String,
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
    #[serde(default = "default_lockfile")]
    pub lockfile: String,
}

fn default_resources_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RESOURCES_DIR)
}
fn default_configuration_file() -> String {
    DEFAULT_CONFIGURATION_FILE.to_string()
}
fn default_credentials_file() -> String {
    DEFAULT_CREDENTIALS_FILE.to_string()
}
fn default_lockfile() -> String {
    DEFAULT_LOCKFILE.to_string()
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            resources_dir: default_resources_dir(),
            configuration_file: default_configuration_file(),
            credentials_file: default_credentials_file(),
            lockfile: default_lockfile(),
        }
    }
}

impl StorageLayout {
    /// Default file names with the resources folder placed under `root`.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        Self {
            resources_dir: root.as_ref().join(DEFAULT_RESOURCES_DIR),
            ..Self::default()
        }
    }

    pub fn configuration_path(&self) -> PathBuf {
        self.resources_dir.join(&self.configuration_file)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.resources_dir.join(&self.credentials_file)
    }

    pub fn lockfile_path(&self) -> PathBuf {
        self.resources_dir.join(&self.lockfile)
    }
}

/// Loads a [`StorageLayout`] from a TOML file, returning the default layout if
/// the file does not exist.
///
/// # Errors
///
/// Returns [`LayoutError::Io`] for file-system errors other than "not found",
/// and [`LayoutError::Parse`] if the TOML is malformed.
pub fn load_layout(path: impl AsRef<Path>) -> Result<StorageLayout, LayoutError> {
    let path = path.as_ref();

    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StorageLayout::default()),
        Err(source) => Err(LayoutError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
