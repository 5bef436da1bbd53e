//! Batch orchestration: validate, name, move, report.
//!
//! Files are handled strictly one after another in input order. A failure
//! in one file is recorded and the batch moves on; nothing here returns an
//! error to the caller. Each call builds a fresh [`BatchReport`], so
//! messages never carry over between batches.

mod place;

use crate::descriptor::{FileDescriptor, UploadBatch};
use crate::mover::{FileMover, FsMover};
use crate::outcome::{BatchReport, FileOutcome};
use crate::policy::UploadPolicy;
use crate::validate::validate;

pub struct Uploader {
    policy: UploadPolicy,
    mover: Box<dyn FileMover>,
}

impl Uploader {
    pub fn new(policy: UploadPolicy) -> Self {
        Self::with_mover(policy, Box::new(FsMover))
    }

    pub fn with_mover(policy: UploadPolicy, mover: Box<dyn FileMover>) -> Self {
        Self { policy, mover }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Processes `batch` using the policy's duplicate-renaming setting.
    pub fn upload(&self, batch: &UploadBatch) -> BatchReport {
        self.upload_with(batch, self.policy.rename_duplicates())
    }

    /// Processes `batch`, overriding duplicate renaming for this call only.
    pub fn upload_with(&self, batch: &UploadBatch, rename_duplicates: bool) -> BatchReport {
        let mut report = BatchReport::default();
        tracing::debug!(
            files = batch.len(),
            destination = %self.policy.destination().display(),
            rename_duplicates,
            "processing upload batch"
        );
        for file in batch {
            self.process(file, rename_duplicates, &mut report);
        }
        tracing::info!(
            stored = report.stored_count(),
            rejected = report.rejected_count(),
            failed = report.failed_count(),
            "upload batch finished"
        );
        report
    }

    fn process(&self, file: &FileDescriptor, rename_duplicates: bool, report: &mut BatchReport) {
        if let Err(rejection) = validate(file, &self.policy) {
            tracing::warn!(name = %file.name, reason = %rejection, "upload rejected");
            report.messages.extend(rejection.messages(&file.name));
            report.outcomes.push(FileOutcome::Rejected {
                name: file.name.clone(),
                rejection,
            });
            return;
        }

        let (resolved, result) = self.place(file, rename_duplicates);
        match result {
            Ok(path) => {
                let mut message = format!("{} was uploaded", file.name);
                if let Some(new_name) = &resolved.renamed {
                    message.push_str(", and was renamed ");
                    message.push_str(new_name);
                }
                message.push('.');
                tracing::info!(name = %file.name, path = %path.display(), "upload stored");
                report.messages.push(message);
                report.outcomes.push(FileOutcome::Stored {
                    original: resolved.original,
                    stored_as: resolved.renamed,
                    path,
                });
            }
            Err(err) => {
                tracing::warn!(name = %file.name, error = %format!("{:#}", err), "upload could not be stored");
                report.messages.push(format!("Could not upload {}.", file.name));
                report.outcomes.push(FileOutcome::MoveFailed {
                    original: resolved.original.clone(),
                    target: resolved.target().to_string(),
                    reason: format!("{:#}", err),
                });
            }
        }
    }
}
