//! CLI command handlers, one per file.

mod size;
pub(super) mod upload;

pub use size::run_size;
pub use upload::{run_upload, UploadArgs};
