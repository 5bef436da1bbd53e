pub mod config;
pub mod logging;

pub mod descriptor;
pub mod dir_lock;
pub mod limits;
pub mod messages;
pub mod mover;
pub mod naming;
pub mod outcome;
pub mod policy;
pub mod size;
pub mod uploader;
pub mod validate;

pub use descriptor::{FileDescriptor, UploadBatch};
pub use outcome::{BatchReport, FileOutcome};
pub use policy::UploadPolicy;
pub use uploader::Uploader;
