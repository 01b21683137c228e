//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The persisted store could not be initialized at startup
    #[error("Failed to open location store at {path}: {message}")]
    StoreOpen { path: PathBuf, message: String },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
