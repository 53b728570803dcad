//! Core error types.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced while dumping and splitting a schema.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem error with the offending path.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the dump stream failed.
    #[error("reading dump: {0}")]
    Read(#[from] io::Error),

    /// An external tool could not be started.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    /// An external tool exited with a failure status.
    #[error("{tool} failed ({status}): {stderr}")]
    Tool {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    /// A schema or object name that cannot form a file name.
    #[error("invalid object name: {0:?}")]
    InvalidName(String),

    /// Metadata could not be encoded.
    #[error("encoding metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
