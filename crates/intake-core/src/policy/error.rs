//! Configuration-time failures. Both abort the configuring call.

use std::path::PathBuf;
use thiserror::Error;

use crate::size::format_bytes;

/// The destination directory cannot be used.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{} must be a valid writeable folder (it does not exist)", .0.display())]
    NotFound(PathBuf),
    #[error("{} must be a valid writeable folder (it is not a directory)", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} must be a valid writeable folder (not writable: {source})", .path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} must be a valid writeable folder (cannot inspect: {source})", .path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A requested policy value is outside what the environment allows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error(
        "maximum size cannot exceed server-set limit, which is {}",
        format_bytes(*.ceiling)
    )]
    ExceedsCeiling { requested: u64, ceiling: u64 },
}
