//! RON data file loading shared by every plugin.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Root directory for gameplay data files.
pub const DATA_DIR: &str = "assets/data";

/// Errors that can occur when loading gameplay data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A spawner or level referenced an enemy type that was never loaded.
    #[error("Unknown enemy type '{0}'")]
    UnknownEnemyType(String),

    /// A value parsed fine but is out of its allowed range.
    #[error("Invalid value for '{field}' in '{path}': {details}")]
    InvalidValue {
        path: String,
        field: &'static str,
        details: String,
    },
}

/// Read and parse a single RON file.
pub fn load_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(path.display().to_string()));
    }

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;

    parse_ron(&contents, path)
}

/// Parse RON text, attributing errors to `path`.
pub fn parse_ron<T: DeserializeOwned>(contents: &str, path: &Path) -> Result<T, DataLoadError> {
    ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: path.display().to_string(),
        details: e.to_string(),
    })
}

/// Load an optional config file, falling back to `T::default()`.
///
/// A missing file is expected (defaults are valid); anything else is logged
/// as an error but never aborts the game.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_ron(path) {
        Ok(value) => {
            bevy::log::info!("Loaded {:?}", path);
            value
        }
        Err(DataLoadError::FileNotFound(_)) => {
            bevy::log::debug!("{:?} not found, using defaults", path);
            T::default()
        }
        Err(e) => {
            bevy::log::error!("{}", e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Default, PartialEq)]
    struct Sample {
        value: u32,
    }

    #[test]
    fn test_parse_ron_reports_path() {
        let err = parse_ron::<Sample>("(value: \"nope\")", Path::new("sample.ron")).unwrap_err();
        match err {
            DataLoadError::ParseError { path, .. } => assert_eq!(path, "sample.ron"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_ron::<Sample>(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let sample: Sample = load_or_default(Path::new("does/not/exist.ron"));
        assert_eq!(sample, Sample::default());
    }
}
