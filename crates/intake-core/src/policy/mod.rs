//! Upload policy: where files go and what is allowed in.
//!
//! A policy is built once against an existing, writable destination directory
//! and then adjusted through its setters before a batch runs. The size ceiling
//! is enforced here, at configuration time, never per file.

mod error;

use std::path::{Path, PathBuf};

use crate::config::IntakeConfig;
use crate::limits::UploadCeiling;
use crate::size::parse_byte_size;

pub use error::{ConfigurationError, PolicyError};

/// 150 KB.
pub const DEFAULT_MAX_SIZE: u64 = 153_600;

pub const DEFAULT_PERMITTED_TYPES: &[&str] = &["image/jpeg", "image/gif", "image/png"];

/// Extensions a web server may execute or interpret.
pub const DEFAULT_UNTRUSTED_EXTENSIONS: &[&str] =
    &["bin", "cgi", "exe", "js", "pl", "php", "py", "sh"];

pub const DEFAULT_QUARANTINE_SUFFIX: &str = ".upload";

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    destination: PathBuf,
    max_size: u64,
    permitted_types: Vec<String>,
    type_checking: bool,
    untrusted_extensions: Vec<String>,
    quarantine_suffix: String,
    rename_duplicates: bool,
    legacy_partial_fallthrough: bool,
}

impl UploadPolicy {
    /// Creates a policy with defaults for `destination`.
    ///
    /// Fails if the path is missing, is not a directory, or a file cannot be
    /// created inside it.
    pub fn new(destination: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = destination.as_ref();
        let meta = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigurationError::NotFound(path.to_path_buf())
            } else {
                ConfigurationError::Inaccessible {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        if !meta.is_dir() {
            return Err(ConfigurationError::NotADirectory(path.to_path_buf()));
        }

        let probe = tempfile::Builder::new()
            .prefix(".intake-probe")
            .tempfile_in(path)
            .map_err(|e| ConfigurationError::NotWritable {
                path: path.to_path_buf(),
                source: e,
            })?;
        drop(probe);

        Ok(Self {
            destination: path.to_path_buf(),
            max_size: DEFAULT_MAX_SIZE,
            permitted_types: DEFAULT_PERMITTED_TYPES.iter().map(|s| s.to_string()).collect(),
            type_checking: true,
            untrusted_extensions: DEFAULT_UNTRUSTED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            quarantine_suffix: DEFAULT_QUARANTINE_SUFFIX.to_string(),
            rename_duplicates: true,
            legacy_partial_fallthrough: false,
        })
    }

    /// Builds a policy for `destination` from the loaded config file.
    pub fn from_config(
        destination: impl AsRef<Path>,
        cfg: &IntakeConfig,
        ceiling: &dyn UploadCeiling,
    ) -> anyhow::Result<Self> {
        let mut policy = Self::new(destination)?;
        policy.set_max_size_str(&cfg.max_size, ceiling)?;
        if !cfg.permitted_types.is_empty() {
            policy.set_permitted_types(cfg.permitted_types.iter().cloned());
        }
        if cfg.allow_all_types {
            policy.allow_all_types(cfg.quarantine_suffix.as_deref());
        }
        policy.set_rename_duplicates(cfg.rename_duplicates);
        policy.set_legacy_partial_fallthrough(cfg.legacy_partial_fallthrough);
        Ok(policy)
    }

    /// Sets the per-file maximum.
    ///
    /// Values above the ceiling fail and leave the current maximum in place.
    /// Zero and negative values are ignored without error.
    pub fn set_max_size(
        &mut self,
        bytes: i64,
        ceiling: &dyn UploadCeiling,
    ) -> Result<(), PolicyError> {
        if bytes <= 0 {
            tracing::debug!(bytes, "ignoring non-positive max size");
            return Ok(());
        }
        self.apply_max_size(bytes as u64, ceiling)
    }

    /// Like [`set_max_size`](Self::set_max_size) for values such as `"500k"`.
    /// Unparseable input is ignored the same way non-positive numbers are.
    pub fn set_max_size_str(
        &mut self,
        value: &str,
        ceiling: &dyn UploadCeiling,
    ) -> Result<(), PolicyError> {
        match parse_byte_size(value) {
            Ok(bytes) => self.apply_max_size(bytes, ceiling),
            Err(e) => {
                tracing::debug!(value, error = %e, "ignoring unparseable max size");
                Ok(())
            }
        }
    }

    fn apply_max_size(&mut self, bytes: u64, ceiling: &dyn UploadCeiling) -> Result<(), PolicyError> {
        let limit = ceiling.max_upload_bytes();
        if bytes > limit {
            return Err(PolicyError::ExceedsCeiling {
                requested: bytes,
                ceiling: limit,
            });
        }
        if bytes == 0 {
            tracing::debug!("ignoring zero max size");
            return Ok(());
        }
        self.max_size = bytes;
        Ok(())
    }

    /// Turns MIME type checking off. Names with untrusted or missing
    /// extensions then get the quarantine suffix instead.
    ///
    /// A given suffix is stored with exactly one leading `.`; an empty suffix
    /// disables suffixing. `None` keeps the current suffix.
    pub fn allow_all_types(&mut self, suffix: Option<&str>) {
        self.type_checking = false;
        if let Some(s) = suffix {
            let bare = s.trim_start_matches('.');
            self.quarantine_suffix = if bare.is_empty() {
                String::new()
            } else {
                format!(".{}", bare)
            };
        }
    }

    pub fn set_permitted_types<I, S>(&mut self, types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permitted_types = types.into_iter().map(Into::into).collect();
    }

    pub fn set_untrusted_extensions<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.untrusted_extensions = extensions
            .into_iter()
            .map(|e| {
                let e: String = e.into();
                e.trim_start_matches('.').to_ascii_lowercase()
            })
            .collect();
    }

    pub fn set_rename_duplicates(&mut self, rename: bool) {
        self.rename_duplicates = rename;
    }

    /// Reproduce the historical double message for transport code 3.
    pub fn set_legacy_partial_fallthrough(&mut self, enabled: bool) {
        self.legacy_partial_fallthrough = enabled;
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn permitted_types(&self) -> &[String] {
        &self.permitted_types
    }

    pub fn type_checking(&self) -> bool {
        self.type_checking
    }

    pub fn untrusted_extensions(&self) -> &[String] {
        &self.untrusted_extensions
    }

    pub fn quarantine_suffix(&self) -> &str {
        &self.quarantine_suffix
    }

    pub fn rename_duplicates(&self) -> bool {
        self.rename_duplicates
    }

    pub fn legacy_partial_fallthrough(&self) -> bool {
        self.legacy_partial_fallthrough
    }

    /// MIME types compare case-insensitively, ignoring parameters such as
    /// `; charset=...`.
    pub fn permits_type(&self, mime_type: &str) -> bool {
        let essence = mime_type.split(';').next().unwrap_or("").trim();
        self.permitted_types
            .iter()
            .any(|t| t.trim().eq_ignore_ascii_case(essence))
    }

    pub fn is_untrusted_extension(&self, extension: &str) -> bool {
        self.untrusted_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// True when names are quarantine-suffixed: type checking off and a
    /// non-empty suffix configured.
    pub fn quarantine_active(&self) -> bool {
        !self.type_checking && !self.quarantine_suffix.is_empty()
    }
}
