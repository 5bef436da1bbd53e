//! Why a file was turned away, and the messages that say so.

use thiserror::Error;

use crate::size::format_bytes;

const NO_FILE_MESSAGE: &str = "You didn't choose a file.";

/// Transport-level failure codes, as the multipart layer reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// 1: larger than the server-wide ceiling.
    ExceedsServerLimit,
    /// 2: larger than the form's declared limit.
    ExceedsFormLimit,
    /// 3: only part of the file arrived.
    Partial,
    /// 4: the field was submitted without a file.
    NoFile,
    Other(u32),
}

impl TransportError {
    /// `None` for 0 (no error).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(TransportError::ExceedsServerLimit),
            2 => Some(TransportError::ExceedsFormLimit),
            3 => Some(TransportError::Partial),
            4 => Some(TransportError::NoFile),
            other => Some(TransportError::Other(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("transport rejected the file as too large (max {})", format_bytes(*.max_size))]
    TransportTooLarge { max_size: u64 },
    #[error("transport delivered a partial file")]
    TransportPartial { legacy_fallthrough: bool },
    #[error("no file was chosen")]
    NoFile,
    #[error("transport failed with code {code}")]
    TransportFailed { code: u32 },
    #[error("file is empty")]
    Empty,
    #[error("file exceeds the maximum size of {}", format_bytes(*.max_size))]
    ExceedsMaxSize { max_size: u64 },
    #[error("type {mime_type:?} is not permitted")]
    TypeNotPermitted { mime_type: String },
    #[error("file name is not usable")]
    InvalidName,
}

impl Rejection {
    /// User-facing lines for `name`, in the order they are logged.
    ///
    /// Every rejection yields one line except a partial transfer under the
    /// legacy fallthrough, which is followed by the no-file line.
    pub fn messages(&self, name: &str) -> Vec<String> {
        match self {
            Rejection::TransportTooLarge { max_size } => vec![format!(
                "{} is too large: (max: {}).",
                name,
                format_bytes(*max_size)
            )],
            Rejection::TransportPartial { legacy_fallthrough } => {
                let mut lines = vec![format!("{} is too large.", name)];
                if *legacy_fallthrough {
                    lines.push(NO_FILE_MESSAGE.to_string());
                }
                lines
            }
            Rejection::NoFile => vec![NO_FILE_MESSAGE.to_string()],
            Rejection::TransportFailed { .. } => vec![format!(
                "Sorry, something went wrong when trying to upload {}",
                name
            )],
            Rejection::Empty => vec![format!("{} is empty.", name)],
            Rejection::ExceedsMaxSize { max_size } => vec![format!(
                "{} exceeds maximum size for a file to be uploaded which is {}",
                name,
                format_bytes(*max_size)
            )],
            Rejection::TypeNotPermitted { .. } => {
                vec![format!("{} is not a permitted file type.", name)]
            }
            Rejection::InvalidName => vec![format!("{} is not a valid file name.", name)],
        }
    }
}
