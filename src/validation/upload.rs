//! Upload validation and deduplication
//!
//! Each entry of `data.dataset.file_upload` is sniffed, checked against the
//! accepted MIME types and hashed. Entries whose content was already seen
//! in the same batch are dropped. The result carries a fresh copy of the
//! dataset object with the deduplicated, annotated upload list; the payload
//! itself is left untouched.

use std::collections::HashSet;
use std::path::Path;

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use super::error::{PayloadError, UploadError};
use super::hash::ContentHasher;
use super::mime::MimeSniffer;
use super::report::UploadValidationReport;
use crate::payload::Payload;

/// Message reported when the batch contains no uploads
pub const NO_UPLOADS: &str = "No file(s) were uploaded";

/// Message reported when `data.dataset` cannot be read at all
pub const DATASET_NOT_CONFIGURED: &str = "The SVM dataset has not been properly configured";

/// An upload entry that passed type and access checks
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord<'a> {
    /// Detected MIME type
    pub mime: String,
    /// Content digest used as the dedup key
    pub digest: String,
    /// The raw upload entry as submitted
    pub filedata: &'a Value,
}

impl FileRecord<'_> {
    /// `{type, filedata}` pair stored in the sanitized upload list
    pub fn annotated(&self) -> Value {
        json!({
            "type": self.mime,
            "filedata": self.filedata,
        })
    }
}

/// Validates and deduplicates a batch of uploaded files
pub struct UploadValidator<'a> {
    sniffer: &'a dyn MimeSniffer,
    hasher: &'a dyn ContentHasher,
    accepted: &'a [String],
}

impl<'a> UploadValidator<'a> {
    pub fn new(
        sniffer: &'a dyn MimeSniffer,
        hasher: &'a dyn ContentHasher,
        accepted: &'a [String],
    ) -> Self {
        Self {
            sniffer,
            hasher,
            accepted,
        }
    }

    /// Validate the uploads listed in `payload`
    pub fn validate_uploads(&self, payload: &Payload) -> UploadValidationReport {
        let dataset = match payload.dataset() {
            Ok(dataset) => dataset,
            Err(PayloadError::MissingSection(_)) => {
                return UploadValidationReport::failed(vec![NO_UPLOADS.to_string()]);
            }
            Err(e) => {
                warn!("Dataset section unusable: {}", e);
                return UploadValidationReport::failed(vec![DATASET_NOT_CONFIGURED.to_string()]);
            }
        };

        let entries = match dataset.get("file_upload") {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            None | Some(Value::Null) | Some(Value::Array(_)) => {
                return UploadValidationReport::failed(vec![NO_UPLOADS.to_string()]);
            }
            Some(other) => {
                warn!("'file_upload' is not a list: {}", other);
                return UploadValidationReport::failed(vec![DATASET_NOT_CONFIGURED.to_string()]);
            }
        };

        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        let mut keep = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            match self.check_entry(entry) {
                Ok(record) => {
                    if seen.insert(record.digest.clone()) {
                        keep.push(record.annotated());
                    } else {
                        debug!("Dropping upload #{}: duplicate of {}", index, record.digest);
                    }
                }
                Err(e) => {
                    warn!("Upload #{} rejected: {}", index, e);
                    errors.push(e.user_message(index));
                }
            }
        }

        info!(
            "Validated {} upload(s): {} kept, {} error(s)",
            entries.len(),
            keep.len(),
            errors.len()
        );

        let mut sanitized: Map<String, Value> = dataset.clone();
        sanitized.insert("file_upload".to_string(), Value::Array(keep));
        UploadValidationReport::new(errors, sanitized)
    }

    /// Sniff, whitelist and hash a single entry
    ///
    /// An entry with an unacceptable type is not hashed and never reaches
    /// the keep-list.
    pub fn check_entry<'e>(&self, entry: &'e Value) -> Result<FileRecord<'e>, UploadError> {
        let filedata = raw_filedata(entry);
        let path = temp_path(filedata).ok_or(UploadError::MissingPath)?;

        let mime = self
            .sniffer
            .detect(path)
            .map_err(|source| UploadError::Sniff {
                path: path.to_path_buf(),
                source,
            })?;

        if !self.accepted.iter().any(|accepted| *accepted == mime) {
            return Err(UploadError::UnacceptableType {
                path: path.to_path_buf(),
                mime,
                accepted: self.accepted.to_vec(),
            });
        }

        let digest = self
            .hasher
            .digest(path)
            .map_err(|source| UploadError::Hash {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(FileRecord {
            mime,
            digest,
            filedata,
        })
    }
}

/// Unwrap an entry annotated by an earlier pass back to the submitted form
fn raw_filedata(entry: &Value) -> &Value {
    match entry.get("filedata") {
        Some(inner) if entry.get("file_temp").is_none() && inner.is_object() => inner,
        _ => entry,
    }
}

/// First `file_temp` path of an upload entry
fn temp_path(filedata: &Value) -> Option<&Path> {
    filedata
        .get("file_temp")?
        .as_array()?
        .first()?
        .as_str()
        .filter(|p| !p.trim().is_empty())
        .map(Path::new)
}
