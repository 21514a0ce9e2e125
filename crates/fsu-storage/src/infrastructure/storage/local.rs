//! File-system implementation of [`LocalStorage`].
//!
//! All state lives under [`StorageLayout::resources_dir`].  The folder is
//! created on the first write, never on a read, so a fresh installation reads
//! as "nothing stored" without touching the disk.
//!
//! # Expected vs unexpected failures
//!
//! A missing file, an empty stored value, or a badly named save directory is
//! reported as a value ([`Lookup::Absent`], [`Insertion::Rejected`]).  Only
//! real I/O failures and corrupt JSON surface as [`StorageError`].
//!
//! # Concurrency
//!
//! Every operation that touches the resources folder runs under a mutex owned
//! by the service.  This serializes callers inside one process (two
//! overlapping lockfile extractions would otherwise share the same path); it
//! does not protect against a second process using the same folder.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use fsu_core::{
    matches_save_directory_name, save_slot_name, Absence, Configuration, Credentials, Insertion,
    Lookup, SavePathRejection,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::StorageError;
use super::layout::StorageLayout;
use super::LocalStorage;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Local storage rooted at a [`StorageLayout`].
#[derive(Debug)]
pub struct LocalStorageService {
    layout: StorageLayout,
    exclusive: Mutex<()>,
}

impl Default for LocalStorageService {
    fn default() -> Self {
        Self::new(StorageLayout::default())
    }
}

impl LocalStorageService {
    pub fn new(layout: StorageLayout) -> Self {
        Self {
            layout,
            exclusive: Mutex::new(()),
        }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Validates `path` and stores it as the active save directory.
    ///
    /// The path must name an existing directory and contain the `savegame`
    /// token (see [`fsu_core::matches_save_directory_name`]).  A rejected path
    /// leaves the configuration file untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NonUtf8Path`] if the path cannot be stored as
    /// JSON text without altering it, or [`StorageError::Io`] if the accepted
    /// path cannot be written.
    pub fn try_insert_configuration_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Insertion, StorageError> {
        let path = path.as_ref();

        if !path.is_dir() {
            warn!("rejected save directory {}: not found", path.display());
            return Ok(Insertion::Rejected(SavePathRejection::DirectoryNotFound));
        }

        let text = path
            .to_str()
            .ok_or_else(|| StorageError::NonUtf8Path {
                path: path.to_path_buf(),
            })?
            .to_owned();
        if !matches_save_directory_name(&text) {
            warn!("rejected save directory {text}: name does not match savegame pattern");
            return Ok(Insertion::Rejected(SavePathRejection::InvalidDirectoryName));
        }

        let _guard = self.lock();
        self.ensure_resources_dir()?;
        let slot = save_slot_name(&text).unwrap_or_default().to_string();
        write_record(&self.layout.configuration_path(), &Configuration::new(text))?;

        info!("stored save directory ({slot})");
        Ok(Insertion::Stored)
    }

    /// Stores `username`, replacing any previous value.  Empty names are
    /// stored as-is.
    pub fn insert_credentials(&self, username: &str) -> Result<(), StorageError> {
        let _guard = self.lock();
        self.ensure_resources_dir()?;
        write_record(&self.layout.credentials_path(), &Credentials::new(username))?;

        info!("stored credentials");
        Ok(())
    }

    /// Returns the stored save directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Parse`] if the configuration file is not valid
    /// JSON; a missing file or empty `SavePath` is [`Lookup::Absent`].
    pub fn try_get_configuration_path(&self) -> Result<Lookup<PathBuf>, StorageError> {
        let _guard = self.lock();
        self.read_configuration_path()
    }

    /// Returns the stored username.  Same error contract as
    /// [`try_get_configuration_path`](Self::try_get_configuration_path).
    pub fn try_get_username(&self) -> Result<Lookup<String>, StorageError> {
        let _guard = self.lock();
        let lookup = read_record(&self.layout.credentials_path(), |c: Credentials| {
            c.username().map(str::to_owned)
        })?;
        debug!("username lookup: {:?}", lookup.absence());
        Ok(lookup)
    }

    /// Copies the bytes remaining in `reader` to `destination`, creating or
    /// truncating it.
    ///
    /// Reading starts at the reader's current position; rewind a `Cursor`
    /// first to write its whole buffer.  The reader stays owned by the caller.
    pub fn write_file<R: Read + ?Sized>(
        &self,
        reader: &mut R,
        destination: impl AsRef<Path>,
    ) -> Result<u64, StorageError> {
        let destination = destination.as_ref();
        let _guard = self.lock();
        let written = copy_to_file(reader, destination)?;
        debug!("wrote {written} bytes to {}", destination.display());
        Ok(written)
    }

    /// Removes the file at `path`.
    ///
    /// Not idempotent: a missing file is an [`StorageError::Io`] with
    /// [`io::ErrorKind::NotFound`].
    pub fn delete_file(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        let _guard = self.lock();
        fs::remove_file(path).map_err(|source| StorageError::io(path, source))?;
        debug!("deleted {}", path.display());
        Ok(())
    }

    /// Writes `reader` to the lockfile, reads it back as text, deletes it and
    /// returns the text.
    ///
    /// The text is decoded as UTF-8 (invalid sequences replaced, a leading
    /// byte-order mark dropped).  If writing or reading fails the lockfile is
    /// still removed before the error is returned.  If only the final delete
    /// fails, that error is returned and the file stays on disk.
    pub fn get_lockfile_content<R: Read + ?Sized>(
        &self,
        reader: &mut R,
    ) -> Result<String, StorageError> {
        let _guard = self.lock();
        self.ensure_resources_dir()?;

        let path = self.layout.lockfile_path();
        let cleanup = LockfileCleanup::new(&path);
        let written = copy_to_file(reader, &path)?;
        let bytes = fs::read(&path).map_err(|source| StorageError::io(&path, source))?;
        cleanup.disarm();
        fs::remove_file(&path).map_err(|source| StorageError::io(&path, source))?;

        debug!("extracted {written} bytes through lockfile");
        Ok(decode_text(&bytes))
    }

    /// Recursively deletes the stored save directory.
    ///
    /// Returns `Ok(None)` without touching the disk when no save directory is
    /// stored.  The configuration record itself is kept.
    ///
    /// # Errors
    ///
    /// [`StorageError::Io`] with [`io::ErrorKind::NotFound`] if nothing exists
    /// at the stored path, or the underlying error if it cannot be removed
    /// (not a directory, locked files, permissions).
    pub fn delete_previous_save(&self) -> Result<Option<PathBuf>, StorageError> {
        let _guard = self.lock();

        let path = match self.read_configuration_path()? {
            Lookup::Found(path) => path,
            Lookup::Absent(reason) => {
                debug!("no previous save to delete ({reason:?})");
                return Ok(None);
            }
        };

        if !path.exists() {
            return Err(StorageError::io(
                &path,
                io::Error::new(io::ErrorKind::NotFound, "save directory does not exist"),
            ));
        }

        remove_dir_all::remove_dir_all(&path).map_err(|source| StorageError::io(&path, source))?;
        info!("deleted previous save at {}", path.display());
        Ok(Some(path))
    }

    fn read_configuration_path(&self) -> Result<Lookup<PathBuf>, StorageError> {
        let lookup = read_record(&self.layout.configuration_path(), |c: Configuration| {
            c.save_path().map(PathBuf::from)
        })?;
        debug!("save directory lookup: {:?}", lookup.absence());
        Ok(lookup)
    }

    fn ensure_resources_dir(&self) -> Result<(), StorageError> {
        let dir = &self.layout.resources_dir;
        if dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|source| StorageError::io(dir, source))?;
        info!("created resources folder {}", dir.display());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a panic elsewhere leaves nothing inconsistent.
        self.exclusive.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocalStorage for LocalStorageService {
    fn try_insert_configuration_path(&self, path: &Path) -> Result<Insertion, StorageError> {
        self.try_insert_configuration_path(path)
    }

    fn insert_credentials(&self, username: &str) -> Result<(), StorageError> {
        self.insert_credentials(username)
    }

    fn try_get_configuration_path(&self) -> Result<Lookup<PathBuf>, StorageError> {
        self.try_get_configuration_path()
    }

    fn try_get_username(&self) -> Result<Lookup<String>, StorageError> {
        self.try_get_username()
    }

    fn write_file(&self, reader: &mut dyn Read, destination: &Path) -> Result<u64, StorageError> {
        self.write_file(reader, destination)
    }

    fn delete_file(&self, path: &Path) -> Result<(), StorageError> {
        self.delete_file(path)
    }

    fn get_lockfile_content(&self, reader: &mut dyn Read) -> Result<String, StorageError> {
        self.get_lockfile_content(reader)
    }

    fn delete_previous_save(&self) -> Result<Option<PathBuf>, StorageError> {
        self.delete_previous_save()
    }
}

/// Removes the lockfile on drop unless disarmed.
struct LockfileCleanup<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> LockfileCleanup<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LockfileCleanup<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match fs::remove_file(self.path) {
            Ok(()) => debug!("removed lockfile after failed extraction"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove lockfile {}: {e}", self.path.display()),
        }
    }
}

fn copy_to_file<R: Read + ?Sized>(reader: &mut R, path: &Path) -> Result<u64, StorageError> {
    let mut file = File::create(path).map_err(|source| StorageError::io(path, source))?;
    let written = io::copy(reader, &mut file).map_err(|source| StorageError::io(path, source))?;
    file.flush().map_err(|source| StorageError::io(path, source))?;
    Ok(written)
}

/// Reads a JSON record and extracts its value.
///
/// A missing file is [`Absence::NoFile`].  A blank file, a `null` document, or
/// an extractor returning `None` is [`Absence::EmptyValue`].
fn read_record<T, V>(
    path: &Path,
    extract: impl FnOnce(T) -> Option<V>,
) -> Result<Lookup<V>, StorageError>
where
    T: DeserializeOwned,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Lookup::Absent(Absence::NoFile)),
        Err(source) => return Err(StorageError::io(path, source)),
    };

    let json = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    if json.iter().all(u8::is_ascii_whitespace) {
        return Ok(Lookup::Absent(Absence::EmptyValue));
    }

    let record: Option<T> = serde_json::from_slice(json).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(match record.and_then(extract) {
        Some(value) => Lookup::Found(value),
        None => Lookup::Absent(Absence::EmptyValue),
    })
}

fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(record)?;
    fs::write(path, json).map_err(|source| StorageError::io(path, source))
}

fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
