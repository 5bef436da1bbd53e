//! Structured per-file results, alongside the prose message log.

use std::path::PathBuf;

use crate::messages::MessageLog;
use crate::validate::Rejection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Failed validation; nothing was moved.
    Rejected { name: String, rejection: Rejection },
    /// Moved into the destination. `stored_as` is set when the name changed.
    Stored {
        original: String,
        stored_as: Option<String>,
        path: PathBuf,
    },
    /// Passed validation but could not be persisted.
    MoveFailed {
        original: String,
        target: String,
        reason: String,
    },
}

impl FileOutcome {
    pub fn original_name(&self) -> &str {
        match self {
            FileOutcome::Rejected { name, .. } => name,
            FileOutcome::Stored { original, .. } => original,
            FileOutcome::MoveFailed { original, .. } => original,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, FileOutcome::Stored { .. })
    }
}

/// What one `upload` call produced: an outcome per input file, in input
/// order, plus the human-readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub messages: MessageLog,
}

impl BatchReport {
    pub fn messages(&self) -> &[String] {
        self.messages.as_slice()
    }

    pub fn stored_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_stored()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Rejected { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::MoveFailed { .. }))
            .count()
    }
}
