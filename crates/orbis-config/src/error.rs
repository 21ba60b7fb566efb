//! Configuration error types.

use std::path::PathBuf;

/// Errors raised while loading or saving `planet.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file or directory could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file or directory could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },

    /// The config could not be rendered as RON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),
}
