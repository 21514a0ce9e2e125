//! Persisted JSON records.
//!
//! Both documents are single-field JSON objects stored in the resources folder:
//!
//! ```json
//! {"SavePath":"C:\\Users\\farmer\\Documents\\My Games\\FarmingSimulator2022\\savegame1"}
//! {"Username":"farmer"}
//! ```
//!
//! The PascalCase field names are part of the on-disk format and are pinned
//! with `#[serde(rename)]`.  A missing or `null` field deserializes to `None`
//! so a hand-edited file degrades to "nothing stored" instead of a parse
//! error.

use serde::{Deserialize, Serialize};

/// The user-selected save-game directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Configuration {
    #[serde(rename = "SavePath", default)]
    pub save_path: Option<String>,
}

impl Configuration {
    pub fn new(save_path: impl Into<String>) -> Self {
        Self {
            save_path: Some(save_path.into()),
        }
    }

    /// Returns the stored path, or `None` when it is absent or empty.
    pub fn save_path(&self) -> Option<&str> {
        non_empty(self.save_path.as_deref())
    }
}

/// The stored account name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "Username", default)]
    pub username: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    /// Returns the stored username, or `None` when it is absent or empty.
    pub fn username(&self) -> Option<&str> {
        non_empty(self.username.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
