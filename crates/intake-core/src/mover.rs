//! Persisting an accepted file at its resolved destination.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Moves a spooled upload to its final path. Failures are reported per file
/// and never abort a batch.
pub trait FileMover {
    fn move_file(&self, from: &Path, to: &Path) -> Result<()>;
}

/// `std::fs` mover: rename, falling back to copy + remove when the spool
/// directory lives on another filesystem. An existing file at `to` is replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMover;

impl FileMover for FsMover {
    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if is_cross_device(&e) => {
                tracing::debug!(
                    from = %from.display(),
                    to = %to.display(),
                    "rename crosses filesystems, copying instead"
                );
                fs::copy(from, to).with_context(|| {
                    format!("failed to copy {} to {}", from.display(), to.display())
                })?;
                fs::remove_file(from)
                    .with_context(|| format!("failed to remove spool file {}", from.display()))?;
                Ok(())
            }
            Err(e) => Err(e).with_context(|| {
                format!("failed to rename {} to {}", from.display(), to.display())
            }),
        }
    }
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(_e: &io::Error) -> bool {
    false
}
