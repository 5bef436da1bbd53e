//! Destination filename resolution.
//!
//! Turns a client name into the name the file is stored under:
//! - directory components stripped, spaces replaced with `_`
//! - quarantine suffix appended to untrusted or extension-less names while
//!   type checking is off
//! - `<stem>_<n>[.<ext>]` probing when the name is already taken; a probed
//!   name with an untrusted extension always carries the suffix
//!
//! Resolution is pure. The caller passes a snapshot of the destination
//! directory (taken once per file) when duplicates should be renamed.

mod sanitize;

use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::policy::UploadPolicy;

pub use sanitize::{client_basename, replace_spaces, split_extension};

/// The name a file will be stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub original: String,
    /// `None` when the original name is used unchanged.
    pub renamed: Option<String>,
}

impl ResolvedName {
    pub fn target(&self) -> &str {
        self.renamed.as_deref().unwrap_or(&self.original)
    }

    pub fn was_renamed(&self) -> bool {
        self.renamed.is_some()
    }
}

/// Names currently present in `dir`.
pub fn snapshot_dir(dir: &Path) -> io::Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in std::fs::read_dir(dir)? {
        names.insert(entry?.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Resolves `original` under `policy`.
///
/// `existing` is the destination snapshot; pass `None` to keep whatever name
/// the earlier steps produced even if it is taken.
pub fn resolve_name(
    original: &str,
    policy: &UploadPolicy,
    existing: Option<&HashSet<String>>,
) -> ResolvedName {
    let cleaned = replace_spaces(client_basename(original));
    let (stem, ext) = split_extension(&cleaned);

    let mut renamed = (cleaned != original).then(|| cleaned.clone());

    if needs_quarantine(policy, ext) {
        renamed = Some(format!("{}{}", cleaned, policy.quarantine_suffix()));
    }

    if let Some(existing) = existing {
        let candidate = renamed.as_deref().unwrap_or(original);
        if existing.contains(candidate) {
            let probed = probe_free_name(stem, ext, policy, existing);
            tracing::debug!(candidate, resolved = %probed, "name taken, probed a free one");
            renamed = Some(probed);
        }
    }

    ResolvedName {
        original: original.to_string(),
        renamed: renamed.filter(|r| r != original),
    }
}

fn needs_quarantine(policy: &UploadPolicy, ext: &str) -> bool {
    policy.quarantine_active() && (ext.is_empty() || policy.is_untrusted_extension(ext))
}

/// Probed names get the suffix for an untrusted extension even while type
/// checking is on, since the declared MIME type is client-supplied.
fn probe_needs_quarantine(policy: &UploadPolicy, ext: &str) -> bool {
    (!ext.is_empty() && policy.is_untrusted_extension(ext)) || needs_quarantine(policy, ext)
}

/// First `<stem>_<n>[.<ext>][suffix]` for n = 1, 2, ... not in `existing`.
fn probe_free_name(
    stem: &str,
    ext: &str,
    policy: &UploadPolicy,
    existing: &HashSet<String>,
) -> String {
    let mut n: u64 = 1;
    loop {
        let mut name = format!("{}_{}", stem, n);
        if !ext.is_empty() {
            name.push('.');
            name.push_str(ext);
        }
        if probe_needs_quarantine(policy, ext) {
            name.push_str(policy.quarantine_suffix());
        }
        if !existing.contains(&name) {
            return name;
        }
        n += 1;
    }
}
