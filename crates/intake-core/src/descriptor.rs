//! Upload input as handed over by the transport layer.
//!
//! A batch arrives either as one descriptor, a list of descriptors, or the
//! multipart "array field" shape: five parallel arrays indexed together.
//! All three end up as an ordered list.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// One uploaded item: client-supplied metadata plus where the bytes are spooled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Filename as sent by the client. Untrusted.
    pub name: String,
    /// Declared content type. Untrusted.
    #[serde(alias = "type")]
    pub mime_type: String,
    #[serde(alias = "tmp_name")]
    pub temp_path: PathBuf,
    pub size: u64,
    /// 0 when the transport received the file cleanly.
    #[serde(default, alias = "error")]
    pub error_code: u32,
}

impl FileDescriptor {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        temp_path: impl Into<PathBuf>,
        size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            temp_path: temp_path.into(),
            size,
            error_code: 0,
        }
    }

    pub fn with_error_code(mut self, code: u32) -> Self {
        self.error_code = code;
        self
    }
}

/// The parallel-array form of a multi-file field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParallelFields {
    pub name: Vec<String>,
    #[serde(rename = "type")]
    pub mime_type: Vec<String>,
    pub tmp_name: Vec<PathBuf>,
    pub error: Vec<u32>,
    pub size: Vec<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("parallel upload fields disagree in length: name={names}, type={types}, tmp_name={temps}, error={errors}, size={sizes}")]
pub struct BatchShapeError {
    pub names: usize,
    pub types: usize,
    pub temps: usize,
    pub errors: usize,
    pub sizes: usize,
}

/// Ordered files to process in one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Manifest")]
pub enum UploadBatch {
    Single(FileDescriptor),
    Multiple(Vec<FileDescriptor>),
}

impl UploadBatch {
    /// Zips parallel arrays into descriptors, keyed by index.
    pub fn from_parallel(fields: ParallelFields) -> Result<Self, BatchShapeError> {
        let n = fields.name.len();
        if [
            fields.mime_type.len(),
            fields.tmp_name.len(),
            fields.error.len(),
            fields.size.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(BatchShapeError {
                names: n,
                types: fields.mime_type.len(),
                temps: fields.tmp_name.len(),
                errors: fields.error.len(),
                sizes: fields.size.len(),
            });
        }

        let files = fields
            .name
            .into_iter()
            .zip(fields.mime_type)
            .zip(fields.tmp_name)
            .zip(fields.error)
            .zip(fields.size)
            .map(|((((name, mime_type), temp_path), error_code), size)| FileDescriptor {
                name,
                mime_type,
                temp_path,
                size,
                error_code,
            })
            .collect();
        Ok(UploadBatch::Multiple(files))
    }

    pub fn len(&self) -> usize {
        match self {
            UploadBatch::Single(_) => 1,
            UploadBatch::Multiple(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileDescriptor> {
        match self {
            UploadBatch::Single(f) => std::slice::from_ref(f).iter(),
            UploadBatch::Multiple(v) => v.iter(),
        }
    }

    pub fn into_descriptors(self) -> Vec<FileDescriptor> {
        match self {
            UploadBatch::Single(f) => vec![f],
            UploadBatch::Multiple(v) => v,
        }
    }
}

impl From<FileDescriptor> for UploadBatch {
    fn from(f: FileDescriptor) -> Self {
        UploadBatch::Single(f)
    }
}

impl From<Vec<FileDescriptor>> for UploadBatch {
    fn from(v: Vec<FileDescriptor>) -> Self {
        UploadBatch::Multiple(v)
    }
}

impl<'a> IntoIterator for &'a UploadBatch {
    type Item = &'a FileDescriptor;
    type IntoIter = std::slice::Iter<'a, FileDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Wire shapes a manifest may use.
#[derive(Deserialize)]
#[serde(untagged)]
enum Manifest {
    Single(FileDescriptor),
    Multiple(Vec<FileDescriptor>),
    Parallel(ParallelFields),
}

impl TryFrom<Manifest> for UploadBatch {
    type Error = BatchShapeError;

    fn try_from(m: Manifest) -> Result<Self, Self::Error> {
        match m {
            Manifest::Single(f) => Ok(UploadBatch::Single(f)),
            Manifest::Multiple(v) => Ok(UploadBatch::Multiple(v)),
            Manifest::Parallel(p) => UploadBatch::from_parallel(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_fields_zip_in_order() {
        let fields = ParallelFields {
            name: vec!["a.png".into(), "b.gif".into()],
            mime_type: vec!["image/png".into(), "image/gif".into()],
            tmp_name: vec!["/tmp/p1".into(), "/tmp/p2".into()],
            error: vec![0, 4],
            size: vec![10, 0],
        };
        let batch = UploadBatch::from_parallel(fields).unwrap();
        let files = batch.into_descriptors();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a.png");
        assert_eq!(files[0].temp_path, PathBuf::from("/tmp/p1"));
        assert_eq!(files[1].mime_type, "image/gif");
        assert_eq!(files[1].error_code, 4);
    }

    #[test]
    fn parallel_fields_length_mismatch() {
        let fields = ParallelFields {
            name: vec!["a.png".into(), "b.png".into()],
            mime_type: vec!["image/png".into()],
            tmp_name: vec!["/tmp/p1".into(), "/tmp/p2".into()],
            error: vec![0, 0],
            size: vec![1, 2],
        };
        let err = UploadBatch::from_parallel(fields).unwrap_err();
        assert_eq!(err.names, 2);
        assert_eq!(err.types, 1);
    }

    #[test]
    fn single_iterates_as_one() {
        let batch: UploadBatch = FileDescriptor::new("x.jpg", "image/jpeg", "/tmp/x", 5).into();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), ["x.jpg"]);
    }

    #[test]
    fn manifest_single_object() {
        let json = r#"{"name": "a b.png", "type": "image/png", "tmp_name": "/tmp/u1", "size": 12}"#;
        let batch: UploadBatch = serde_json::from_str(json).unwrap();
        match batch {
            UploadBatch::Single(f) => {
                assert_eq!(f.name, "a b.png");
                assert_eq!(f.mime_type, "image/png");
                assert_eq!(f.error_code, 0);
            }
            other => panic!("expected Single, got {:?}", other),
        }
    }

    #[test]
    fn manifest_list() {
        let json = r#"[
            {"name": "a.png", "mime_type": "image/png", "temp_path": "/tmp/1", "size": 1},
            {"name": "b.png", "mime_type": "image/png", "temp_path": "/tmp/2", "size": 0, "error_code": 4}
        ]"#;
        let batch: UploadBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.iter().nth(1).unwrap().error_code, 4);
    }

    #[test]
    fn manifest_parallel_arrays() {
        let json = r#"{
            "name": ["a.png", "b.png"],
            "type": ["image/png", "image/png"],
            "tmp_name": ["/tmp/1", "/tmp/2"],
            "error": [0, 0],
            "size": [3, 4]
        }"#;
        let batch: UploadBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.len(), 2);

        let bad = r#"{"name": ["a"], "type": [], "tmp_name": [], "error": [], "size": []}"#;
        assert!(serde_json::from_str::<UploadBatch>(bad).is_err());
    }
}
