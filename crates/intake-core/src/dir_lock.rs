//! Serializing name probing and moves per destination directory.
//!
//! A directory snapshot goes stale the moment another writer touches the
//! directory. Two things narrow that gap:
//! - [`DirLock`]: one process-wide mutex per destination, held from snapshot
//!   to move, so uploaders in the same process never race each other.
//! - [`NameReservation`]: the chosen name is claimed with an exclusive create
//!   before the move. If someone outside the lock took it first, the claim
//!   fails and the caller probes again.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

/// Handle on the mutex for one destination directory.
#[derive(Debug, Clone)]
pub struct DirLock {
    inner: Arc<Mutex<()>>,
}

impl DirLock {
    /// The lock shared by every caller naming the same directory. Paths are
    /// canonicalized when possible so `dir` and `dir/.` agree.
    pub fn for_dir(dir: &Path) -> Self {
        let key = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let registry = LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
        let mut map = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Entries nobody else holds are idle; drop them so the map tracks
        // live directories only.
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
        let inner = map.entry(key).or_default().clone();
        DirLock { inner }
    }

    /// Blocks until the directory is free. A poisoned lock is still usable:
    /// the guarded state is the directory itself, not data in the mutex.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn same_as(&self, other: &DirLock) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// An empty placeholder claiming a destination name. Removed on drop unless
/// [`commit`](Self::commit)ted after the real file has replaced it.
#[derive(Debug)]
pub struct NameReservation {
    path: PathBuf,
    armed: bool,
}

impl NameReservation {
    /// Fails with [`io::ErrorKind::AlreadyExists`] if `path` is taken.
    pub fn claim(path: &Path) -> io::Result<Self> {
        OpenOptions::new().write(true).create_new(true).open(path)?;
        Ok(NameReservation {
            path: path.to_path_buf(),
            armed: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keeps whatever now lives at the reserved path.
    pub fn commit(mut self) {
        self.armed = false;
    }
}

impl Drop for NameReservation {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to release name reservation");
            }
        }
    }
}
