//! Save-game directory naming rule.
//!
//! Farming Simulator stores each career in a folder called `savegame1`,
//! `savegame2`, ... inside the user's documents.  Before a directory is
//! remembered as the active save location it must look like one of those
//! folders.
//!
//! The rule is deliberately loose: the path string only has to *contain* the
//! literal token `savegame` (case-sensitive), optionally followed by up to two
//! digits.  Anything may precede it, so both `savegame1` and
//! `C:\Users\me\Documents\My Games\FarmingSimulator2022\savegame12` pass.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Greedy prefix, then the `savegame` token and up to two slot digits.
static SAVE_DIRECTORY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*(savegame\d{0,2})").expect("save directory pattern is a valid regex")
});

/// Why a candidate save directory was not accepted.
///
/// The `Display` output is shown to the user verbatim.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SavePathRejection {
    /// The path does not name an existing directory.
    #[error("Save directory not found.")]
    DirectoryNotFound,

    /// The path does not contain the `savegame` token.
    #[error("Save directory should be named savegame and number.")]
    InvalidDirectoryName,
}

/// Returns `true` if `path` satisfies the save directory naming rule.
pub fn matches_save_directory_name(path: &str) -> bool {
    SAVE_DIRECTORY_PATTERN.is_match(path)
}

/// Returns the matched save slot token (e.g. `savegame12`), if any.
///
/// Because the prefix is greedy, the *last* `savegame` occurrence wins.
pub fn save_slot_name(path: &str) -> Option<&str> {
    SAVE_DIRECTORY_PATTERN
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
