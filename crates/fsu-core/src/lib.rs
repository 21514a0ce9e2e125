//! # fsu-core
//!
//! Shared domain library for Farming Simulator Utilities: the records that are
//! persisted on disk, the naming rule a save-game directory must satisfy, and
//! the outcome types returned by storage lookups.
//!
//! It has zero dependencies on the file system.  Everything that touches disk
//! lives in `fsu-storage`.
//!
//! # Architecture overview
//!
//! - **`domain::records`** – `Configuration` and `Credentials`, the two JSON
//!   documents kept in the resources folder.  The serde attributes here pin
//!   the wire format (`{"SavePath": ...}`, `{"Username": ...}`).
//!
//! - **`domain::save_path`** – The `savegame` + up to two digits rule that a
//!   user-selected save directory must match, and the user-facing rejection
//!   messages.
//!
//! - **`domain::outcome`** – `Lookup` and `Insertion`, which model expected
//!   failures (missing file, invalid path) as values instead of errors.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `fsu_core::Configuration` instead of `fsu_core::domain::records::Configuration`.
pub use domain::outcome::{Absence, Insertion, Lookup};
pub use domain::records::{Configuration, Credentials};
pub use domain::save_path::{matches_save_directory_name, save_slot_name, SavePathRejection};
