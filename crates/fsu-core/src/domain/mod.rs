//! Domain entities for Farming Simulator Utilities.
//!
//! This module contains pure rules and data types with no infrastructure
//! dependencies.  Nothing in here opens a file or reads the environment, so
//! every type can be unit-tested on any platform without setup.
//!
//! The storage crate depends on the domain, but the domain never depends on
//! storage.

/// Discriminated results for lookups and insertions.
pub mod outcome;

/// Persisted JSON records.
pub mod records;

/// Save-game directory naming rule.
pub mod save_path;
