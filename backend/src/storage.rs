//! File storage for uploaded attachments.
//!
//! Files live under a single managed root directory. Records persist
//! root-relative references of the form `/uploads/<generated-name>`, never
//! absolute paths, so the root can be relocated without rewriting rows.
//! Generated names combine the owner id, the current unix time, a short
//! random component, and the sanitized base name of the original file.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Maximum accepted upload size in bytes (5 MB).
pub const MAX_UPLOAD_BYTES: u64 = 5_000_000;

/// Prefix under which stored files are referenced and served.
pub const REFERENCE_PREFIX: &str = "/uploads/";

#[derive(Debug)]
pub enum StorageError {
    /// No file was provided where one was expected.
    NoFileProvided,
    /// The upload exceeds `MAX_UPLOAD_BYTES`.
    UploadTooLarge,
    /// The upload stream ended or failed before the file was fully received.
    UploadIncomplete(String),
    /// The storage root is missing, uncreatable, or unwritable.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NoFileProvided => write!(f, "No file was uploaded."),
            StorageError::UploadTooLarge => {
                write!(f, "File is too large. Maximum size is 5MB.")
            }
            StorageError::UploadIncomplete(_) => {
                write!(f, "The uploaded file was only partially uploaded.")
            }
            StorageError::Unavailable(_) => {
                write!(
                    f,
                    "Upload storage is unavailable. Please contact an administrator."
                )
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// An upload received from the client, already drained from the request
/// stream. `size` is the true number of bytes received; `bytes` may be
/// truncated once the size limit is exceeded, since oversized uploads are
/// rejected anyway.
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub bytes: Vec<u8>,
    pub size: u64,
}

/// File storage adapter rooted at a managed directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> FileStore {
        FileStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Saves an upload under the storage root and returns the root-relative
    /// reference to persist in the record.
    pub fn store(&self, owner_id: i64, upload: &Upload) -> Result<String, StorageError> {
        if upload.original_name.trim().is_empty() {
            return Err(StorageError::NoFileProvided);
        }
        if upload.size > MAX_UPLOAD_BYTES {
            return Err(StorageError::UploadTooLarge);
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| StorageError::Unavailable(format!("cannot create upload dir: {}", e)))?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let rand = Uuid::new_v4().simple().to_string();
        let base = sanitize_base_name(&upload.original_name);
        let file_name = format!("{}_{}_{}_{}", owner_id, now, &rand[..8], base);

        let target = self.root.join(&file_name);
        fs::write(&target, &upload.bytes)
            .map_err(|e| StorageError::Unavailable(format!("cannot write upload: {}", e)))?;

        Ok(format!("{}{}", REFERENCE_PREFIX, file_name))
    }

    /// Removes the file behind a stored reference. A missing file is not an
    /// error; the reference is reduced to its base name before joining with
    /// the root, so it can never point outside the managed directory.
    pub fn delete(&self, reference: &str) -> Result<(), StorageError> {
        let base = match Path::new(reference).file_name().and_then(|n| n.to_str()) {
            Some(name) if name != ".." && !name.is_empty() => name,
            _ => return Ok(()),
        };

        match fs::remove_file(self.root.join(base)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Unavailable(format!(
                "cannot delete stored file: {}",
                e
            ))),
        }
    }

    /// Whether a stored reference currently resolves to a file on disk.
    pub fn exists(&self, reference: &str) -> bool {
        Path::new(reference)
            .file_name()
            .map(|base| self.root.join(base).is_file())
            .unwrap_or(false)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Strips any path components from the client-supplied file name and maps
/// characters outside `[A-Za-z0-9._-]` to underscores.
fn sanitize_base_name(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "file".to_string()
    } else {
        cleaned
    }
}
