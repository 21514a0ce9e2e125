//! Storage infrastructure: the resources folder on local disk.
//!
//! - **`layout`** – where the resources folder is and what its files are
//!   called; optionally loaded from TOML.
//! - **`local`** – [`LocalStorageService`](local::LocalStorageService), the
//!   file-system implementation of [`LocalStorage`].
//! - **`error`** – [`StorageError`](error::StorageError) for unexpected
//!   I/O and JSON failures.
//!
//! # Testability
//!
//! Callers that only need the operations can depend on the [`LocalStorage`]
//! trait and substitute an in-memory fake in their own tests.

use std::io::Read;
use std::path::{Path, PathBuf};

use fsu_core::{Insertion, Lookup};

pub mod error;
pub mod layout;
pub mod local;

use error::StorageError;

/// Read/write/delete lifecycle for configuration, credentials and lockfile.
pub trait LocalStorage: Send + Sync {
    /// Validates `path` and, if accepted, stores it as the active save directory.
    fn try_insert_configuration_path(&self, path: &Path) -> Result<Insertion, StorageError>;

    /// Stores `username`, replacing any previous value.
    fn insert_credentials(&self, username: &str) -> Result<(), StorageError>;

    /// Returns the stored save directory.
    fn try_get_configuration_path(&self) -> Result<Lookup<PathBuf>, StorageError>;

    /// Returns the stored username.
    fn try_get_username(&self) -> Result<Lookup<String>, StorageError>;

    /// Copies the reader's remaining bytes to `destination`; returns the byte count.
    fn write_file(&self, reader: &mut dyn Read, destination: &Path) -> Result<u64, StorageError>;

    /// Removes the file at `path`.  Fails if it does not exist.
    fn delete_file(&self, path: &Path) -> Result<(), StorageError>;

    /// Shuttles the reader's bytes through the lockfile and returns them as text.
    fn get_lockfile_content(&self, reader: &mut dyn Read) -> Result<String, StorageError>;

    /// Deletes the stored save directory tree, returning the removed path.
    fn delete_previous_save(&self) -> Result<Option<PathBuf>, StorageError>;
}
