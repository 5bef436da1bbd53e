//! Per-file acceptance checks.
//!
//! Checks run in a fixed order and the first failure wins: transport error,
//! size, declared type (only while type checking is on), then whether the
//! client name leaves anything usable once stripped of directories.

mod rejection;

use crate::descriptor::FileDescriptor;
use crate::naming::client_basename;
use crate::policy::UploadPolicy;

pub use rejection::{Rejection, TransportError};

/// Ok if `file` may be named and moved under `policy`.
pub fn validate(file: &FileDescriptor, policy: &UploadPolicy) -> Result<(), Rejection> {
    if let Some(err) = TransportError::from_code(file.error_code) {
        return Err(transport_rejection(err, policy));
    }

    if file.size == 0 {
        return Err(Rejection::Empty);
    }
    if file.size > policy.max_size() {
        return Err(Rejection::ExceedsMaxSize {
            max_size: policy.max_size(),
        });
    }

    if policy.type_checking() && !policy.permits_type(&file.mime_type) {
        return Err(Rejection::TypeNotPermitted {
            mime_type: file.mime_type.clone(),
        });
    }

    let base = client_basename(&file.name);
    if base.is_empty() || base == "." || base == ".." {
        return Err(Rejection::InvalidName);
    }

    Ok(())
}

fn transport_rejection(err: TransportError, policy: &UploadPolicy) -> Rejection {
    match err {
        TransportError::ExceedsServerLimit | TransportError::ExceedsFormLimit => {
            Rejection::TransportTooLarge {
                max_size: policy.max_size(),
            }
        }
        TransportError::Partial => Rejection::TransportPartial {
            legacy_fallthrough: policy.legacy_partial_fallthrough(),
        },
        TransportError::NoFile => Rejection::NoFile,
        TransportError::Other(code) => Rejection::TransportFailed { code },
    }
}

#[cfg(test)]
mod tests;
