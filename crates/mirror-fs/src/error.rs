//! Error types for mirror-fs

use std::path::{Path, PathBuf};

/// Result type for mirror-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path {path} is not under root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn outside_root(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::OutsideRoot {
            path: path.into(),
            root: root.into(),
        }
    }

    /// Convert a traversal error, keeping the offending path when known.
    pub fn walk(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("directory traversal failed"));
        Self::Io { path, source }
    }
}
