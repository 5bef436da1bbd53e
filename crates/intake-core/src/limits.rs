//! Server-imposed upload ceiling.
//!
//! The hosting environment caps how large an upload may be before it ever
//! reaches the pipeline. A policy may not be configured above that cap.

use crate::size::parse_byte_size;

/// Environment variable holding the ceiling, in byte-size syntax (`"8M"`).
pub const CEILING_ENV_VAR: &str = "INTAKE_UPLOAD_MAX_FILESIZE";

/// Ceiling used when the environment does not say otherwise.
pub const DEFAULT_CEILING: &str = "2M";

/// Read-only query for the largest upload the environment will accept.
pub trait UploadCeiling {
    fn max_upload_bytes(&self) -> u64;
}

/// A ceiling known up front (tests, config overrides).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCeiling(pub u64);

impl UploadCeiling for FixedCeiling {
    fn max_upload_bytes(&self) -> u64 {
        self.0
    }
}

/// Reads the ceiling from [`CEILING_ENV_VAR`] on every query.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCeiling;

impl UploadCeiling for EnvCeiling {
    fn max_upload_bytes(&self) -> u64 {
        let raw = std::env::var(CEILING_ENV_VAR).ok();
        ceiling_from(raw.as_deref())
    }
}

fn ceiling_from(raw: Option<&str>) -> u64 {
    let fallback = || parse_byte_size(DEFAULT_CEILING).unwrap_or(2 * 1024 * 1024);
    match raw {
        None => fallback(),
        Some(v) => match parse_byte_size(v) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    value = v,
                    error = %e,
                    "ignoring unparseable {}, using {}",
                    CEILING_ENV_VAR,
                    DEFAULT_CEILING
                );
                fallback()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_ceiling_reports_its_value() {
        assert_eq!(FixedCeiling(4096).max_upload_bytes(), 4096);
    }

    #[test]
    fn unset_falls_back_to_default() {
        assert_eq!(ceiling_from(None), 2 * 1024 * 1024);
    }

    #[test]
    fn parses_unit_suffix() {
        assert_eq!(ceiling_from(Some("8M")), 8 * 1024 * 1024);
        assert_eq!(ceiling_from(Some("512k")), 512 * 1024);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        assert_eq!(ceiling_from(Some("lots")), 2 * 1024 * 1024);
    }
}
