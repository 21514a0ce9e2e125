//! fsu-storage library entry point.
//!
//! Owns the resources folder of Farming Simulator Utilities: the stored
//! save-game configuration, the stored credentials, and the transient lockfile
//! used to turn a downloaded byte buffer into text.
//!
//! Integration tests in `tests/` use the same module tree through the
//! re-exports below.

pub mod infrastructure;

pub use infrastructure::storage::error::StorageError;
pub use infrastructure::storage::layout::{load_layout, LayoutError, StorageLayout};
pub use infrastructure::storage::local::LocalStorageService;
pub use infrastructure::storage::LocalStorage;
