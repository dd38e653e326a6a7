//! JSON option presets.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tinytidy_core::OptionTable;

/// Errors loading a preset file.
#[derive(Debug, Error)]
pub enum PresetError {
    /// The file could not be read.
    #[error("cannot read preset {path}: {source}")]
    Io {
        /// Preset path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON object of string, integer or boolean values.
    #[error("invalid preset {path}: {source}")]
    Parse {
        /// Preset path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Reads an option table from a JSON file.
pub fn load_preset(path: &Path) -> Result<OptionTable, PresetError> {
    let json = std::fs::read_to_string(path).map_err(|source| PresetError::Io {
        path: path.to_owned(),
        source,
    })?;
    OptionTable::from_json_str(&json).map_err(|source| PresetError::Parse {
        path: path.to_owned(),
        source,
    })
}
