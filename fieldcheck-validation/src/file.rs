//! Uploaded file descriptors and content-type sniffing.

use crate::Result;
use mime::Mime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Upload descriptors keyed by form field name.
pub type FileMap = HashMap<String, UploadedFile>;

/// Bytes read from the head of a file when sniffing its type.
const SNIFF_LEN: usize = 512;

/// Status code attached to a multipart upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum UploadError {
    /// Upload succeeded
    Ok,
    /// Exceeded the server-wide size limit
    IniSize,
    /// Exceeded the size limit declared by the form
    FormSize,
    /// Only part of the file arrived
    Partial,
    /// The field was submitted without a file
    NoFile,
    /// No temporary directory on the server
    NoTmpDir,
    /// Could not write the file to disk
    CantWrite,
    /// An extension stopped the upload
    Extension,
    /// Any other code
    Other(u8),
}

impl UploadError {
    pub fn code(self) -> u8 {
        match self {
            UploadError::Ok => 0,
            UploadError::IniSize => 1,
            UploadError::FormSize => 2,
            UploadError::Partial => 3,
            UploadError::NoFile => 4,
            UploadError::NoTmpDir => 6,
            UploadError::CantWrite => 7,
            UploadError::Extension => 8,
            UploadError::Other(code) => code,
        }
    }
}

impl From<u8> for UploadError {
    fn from(code: u8) -> Self {
        match code {
            0 => UploadError::Ok,
            1 => UploadError::IniSize,
            2 => UploadError::FormSize,
            3 => UploadError::Partial,
            4 => UploadError::NoFile,
            6 => UploadError::NoTmpDir,
            7 => UploadError::CantWrite,
            8 => UploadError::Extension,
            other => UploadError::Other(other),
        }
    }
}

impl From<UploadError> for u8 {
    fn from(error: UploadError) -> Self {
        error.code()
    }
}

/// Metadata for one uploaded file, as produced by the multipart parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Original filename sent by the client
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Where the server stored the upload
    pub tmp_path: PathBuf,
    /// Upload status
    pub upload_error: UploadError,
}

impl UploadedFile {
    /// Descriptor for a successful upload.
    pub fn new(name: impl Into<String>, size: u64, tmp_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size,
            tmp_path: tmp_path.into(),
            upload_error: UploadError::Ok,
        }
    }

    /// Descriptor for a field submitted without a file.
    pub fn missing() -> Self {
        Self {
            name: String::new(),
            size: 0,
            tmp_path: PathBuf::new(),
            upload_error: UploadError::NoFile,
        }
    }

    /// Set the upload status.
    pub fn with_error(mut self, error: impl Into<UploadError>) -> Self {
        self.upload_error = error.into();
        self
    }

    /// Whether the client actually sent a file.
    pub fn is_present(&self) -> bool {
        self.upload_error != UploadError::NoFile
    }

    /// Extension of the original filename, without the dot.
    ///
    /// Empty when the name has no dot.
    pub fn extension(&self) -> &str {
        let base = self
            .name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.name.as_str());
        base.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
    }

    /// Size expressed in mebibytes.
    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.size)
    }

    /// Sniff the content type of the stored upload.
    pub fn content_type(&self) -> Result<Mime> {
        sniff_content_type(&self.tmp_path)
    }
}

/// Convert a byte count to mebibytes.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / 1_048_576.0
}

/// Detect a content type from leading bytes.
///
/// Image formats are recognised by `image`, everything else `infer` knows
/// (pdf, archives, audio, video) by `infer`. Remaining input is `text/plain`
/// when it reads as UTF-8 and `application/octet-stream` otherwise.
pub fn sniff_bytes(head: &[u8]) -> Mime {
    let essence = image::guess_format(head)
        .ok()
        .map(|format| format.to_mime_type())
        .or_else(|| infer::get(head).map(|kind| kind.mime_type()));
    if let Some(mime) = essence.and_then(|essence| essence.parse().ok()) {
        return mime;
    }

    let text = match std::str::from_utf8(head) {
        Ok(_) => true,
        // a multi-byte character may be cut at the read boundary
        Err(e) => e.error_len().is_none(),
    };
    if text && !head.contains(&0) {
        mime::TEXT_PLAIN
    } else {
        mime::APPLICATION_OCTET_STREAM
    }
}

/// Detect the content type of a file on disk from its leading bytes.
pub fn sniff_content_type(path: impl AsRef<Path>) -> Result<Mime> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    Ok(sniff_bytes(&head))
}

/// Whether a detected content type satisfies an expected format.
///
/// `expected` may be a full type (`image/png`), a wildcard (`image/*`), a
/// bare subtype (`png`) or a file extension (`jpg`).
pub fn format_matches(detected: &Mime, expected: &str) -> bool {
    let expected = expected.trim().trim_start_matches('.').to_ascii_lowercase();
    if expected.is_empty() {
        return false;
    }

    if let Some((top, sub)) = expected.split_once('/') {
        return top == detected.type_().as_str()
            && (sub == "*" || sub == detected.subtype().as_str());
    }

    if expected == detected.subtype().as_str() {
        return true;
    }

    mime_guess::from_ext(&expected)
        .iter()
        .any(|guess| guess.essence_str() == detected.essence_str())
}
