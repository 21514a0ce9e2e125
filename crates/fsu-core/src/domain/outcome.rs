//! Discriminated outcomes for storage operations whose failure is expected.
//!
//! A missing configuration file or a badly named save directory is a normal
//! situation for a first-run desktop tool, not an error.  These enums carry
//! that distinction in the type: storage functions return
//! `Result<Lookup<T>, StorageError>`, where `Err` is reserved for genuine
//! I/O or parse failures.

use crate::domain::save_path::SavePathRejection;

/// Why a lookup found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    /// The backing file does not exist.
    NoFile,
    /// The file exists but the stored value is empty or missing.
    EmptyValue,
}

/// Result of reading a stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Absent(Absence),
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Converts into an `Option`, discarding the absence reason.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent(_) => None,
        }
    }

    pub fn absence(&self) -> Option<Absence> {
        match self {
            Lookup::Found(_) => None,
            Lookup::Absent(reason) => Some(*reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Absent(reason) => Lookup::Absent(reason),
        }
    }
}

impl<T: Default> Lookup<T> {
    /// Returns the value, or `T::default()` (an empty string for text) when
    /// absent.
    pub fn value_or_default(self) -> T {
        self.found().unwrap_or_default()
    }
}

/// Result of trying to store a save-game directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The path was accepted and written.
    Stored,
    /// The path was refused; nothing was written.
    Rejected(SavePathRejection),
}

impl Insertion {
    pub fn is_stored(&self) -> bool {
        matches!(self, Insertion::Stored)
    }

    pub fn rejection(&self) -> Option<SavePathRejection> {
        match self {
            Insertion::Stored => None,
            Insertion::Rejected(reason) => Some(*reason),
        }
    }

    /// The user-facing message for a rejection, `None` when stored.
    pub fn error_message(&self) -> Option<String> {
        self.rejection().map(|r| r.to_string())
    }
}
