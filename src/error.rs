//! Error types for the fallible edges of the game (files on disk).
//!
//! The simulation itself never fails; crashes and running out of money are
//! state transitions, not errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading settings or cached assets.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("i/o error on {path:?}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for [`crate::Settings`]
    #[error("invalid settings in {path:?}: {source}")]
    Json {
        /// Settings file
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// A light table buffer has the wrong number of bytes
    #[error("light table has {actual} bytes, expected {expected}")]
    LightTableSize {
        /// Required size
        expected: usize,
        /// Size found
        actual: usize,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used by the loading code.
pub type Result<T> = std::result::Result<T, Error>;
