//! Naming and moving one accepted file under the directory lock.

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use super::Uploader;
use crate::descriptor::FileDescriptor;
use crate::dir_lock::{DirLock, NameReservation};
use crate::naming::{resolve_name, snapshot_dir, ResolvedName};
use crate::policy::UploadPolicy;

/// Re-probes allowed when a reserved name turns out to be taken.
pub(super) const MAX_CLAIM_ATTEMPTS: u32 = 8;

impl Uploader {
    /// Resolves the destination name and moves the file there.
    ///
    /// Without duplicate renaming the file simply lands on its resolved name,
    /// replacing anything already there. With it, the snapshot, probe and
    /// move run under the directory lock and the name is claimed before the
    /// move.
    pub(super) fn place(
        &self,
        file: &FileDescriptor,
        rename_duplicates: bool,
    ) -> (ResolvedName, Result<PathBuf>) {
        let dest = self.policy.destination();
        let lock = DirLock::for_dir(dest);
        let _guard = lock.lock();

        if !rename_duplicates {
            let resolved = resolve_name(&file.name, &self.policy, None);
            let target = dest.join(resolved.target());
            let result = self.mover.move_file(&file.temp_path, &target).map(|()| target);
            return (resolved, result);
        }

        let existing = match snapshot_dir(dest)
            .with_context(|| format!("failed to list {}", dest.display()))
        {
            Ok(names) => names,
            Err(e) => return (resolve_name(&file.name, &self.policy, None), Err(e)),
        };

        let (resolved, claimed) = claim_free_name(&self.policy, &file.name, existing);
        let reservation = match claimed {
            Ok(r) => r,
            Err(e) => return (resolved, Err(e)),
        };

        let target = reservation.path().to_path_buf();
        match self.mover.move_file(&file.temp_path, &target) {
            Ok(()) => {
                reservation.commit();
                (resolved, Ok(target))
            }
            Err(e) => (resolved, Err(e)),
        }
    }
}

/// Resolves `name` against `existing` and reserves the result.
///
/// The snapshot can miss names: another writer outside this process, or a
/// case-insensitive filesystem where `Photo.jpg` blocks `photo.jpg`. A lost
/// claim adds the name to the snapshot and probing repeats.
pub(super) fn claim_free_name(
    policy: &UploadPolicy,
    name: &str,
    mut existing: HashSet<String>,
) -> (ResolvedName, Result<NameReservation>) {
    let dest: &Path = policy.destination();
    let mut resolved = resolve_name(name, policy, Some(&existing));
    for attempt in 1..=MAX_CLAIM_ATTEMPTS {
        let target = dest.join(resolved.target());
        match NameReservation::claim(&target) {
            Ok(r) => return (resolved, Ok(r)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!(
                    attempt,
                    name = resolved.target(),
                    "name taken outside the snapshot, probing again"
                );
                existing.insert(resolved.target().to_string());
                resolved = resolve_name(name, policy, Some(&existing));
            }
            Err(e) => {
                let err = anyhow::Error::from(e)
                    .context(format!("failed to reserve {}", target.display()));
                return (resolved, Err(err));
            }
        }
    }

    let err = anyhow!(
        "no free name for {} after {} attempts",
        name,
        MAX_CLAIM_ATTEMPTS
    );
    (resolved, Err(err))
}
