//! Binary-to-text encoding of candidate files.
//!
//! Every encoded file is a `data:<mime>;base64,<payload>` string. The prefix
//! is kept so downstream consumers can strip or use it uniformly.

use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::debug;

use crate::error::{ComposeError, Result};
use crate::ingest::mime;

/// Where a candidate file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Read from disk when encoded.
    Path(PathBuf),
    /// Already in memory.
    Bytes(Vec<u8>),
}

/// A file offered for ingestion, before any validation.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Display name (usually the file name without directories).
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Declared size in bytes, used for the budget check before reading.
    pub size: u64,
    pub source: FileSource,
}

/// Result of a successful encode.
#[derive(Debug, Clone)]
pub struct Encoded {
    /// Number of raw bytes encoded.
    pub size: u64,
    /// Data-URI prefixed base64 text.
    pub data: String,
}

impl CandidateFile {
    /// Wrap in-memory content.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }

    /// Describe a file on disk. Nothing is read beyond metadata and the
    /// few bytes needed for MIME sniffing.
    ///
    /// A missing or unreadable file still yields a candidate (size 0) so the
    /// failure surfaces as an encoding rejection for that file alone.
    pub async fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Could not stat candidate file");
                0
            }
        };
        Self {
            name,
            mime_type: mime::detect(path).await,
            size,
            source: FileSource::Path(path.to_path_buf()),
        }
    }
}

/// Read and encode one candidate.
///
/// The encoded length is checked against the declared size: a file that
/// changed between the budget check and the read is rejected rather than
/// silently recorded with a size that does not match its data.
pub async fn encode(candidate: &CandidateFile) -> Result<Encoded> {
    let bytes = match &candidate.source {
        FileSource::Bytes(bytes) => std::borrow::Cow::Borrowed(bytes.as_slice()),
        FileSource::Path(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| ComposeError::encoding(&candidate.name, e))?;
            std::borrow::Cow::Owned(bytes)
        }
    };

    let size = bytes.len() as u64;
    if size != candidate.size {
        return Err(ComposeError::encoding(
            &candidate.name,
            format!("size changed while reading ({} -> {size} bytes)", candidate.size),
        ));
    }

    debug!(name = %candidate.name, size, "Encoding file");
    Ok(Encoded {
        size,
        data: data_uri(&candidate.mime_type, &bytes),
    })
}

/// Build a `data:` URI for raw bytes.
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{b64}", mime::essence(mime_type))
}

/// Return the bare base64 part of an encoded value.
pub fn strip_data_uri(data: &str) -> &str {
    match data.strip_prefix("data:") {
        Some(rest) => rest.split_once(";base64,").map_or(rest, |(_, b64)| b64),
        None => data,
    }
}

/// Decode an encoded value back to raw bytes.
pub fn decode(name: &str, data: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(strip_data_uri(data))
        .map_err(|e| ComposeError::encoding(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_encode_bytes_has_prefix_and_decodes() {
        let c = CandidateFile::from_bytes("a.txt", "text/plain", b"hello world".to_vec());
        let enc = encode(&c).await.unwrap();
        assert!(enc.data.starts_with("data:text/plain;base64,"));
        assert_eq!(enc.size, 11);
        assert_eq!(decode("a.txt", &enc.data).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_encode_missing_file_is_encoding_error() {
        let c = CandidateFile::from_path("/definitely/not/here.pdf").await;
        assert_eq!(c.name, "here.pdf");
        assert_eq!(c.size, 0);
        let err = encode(&c).await.unwrap_err();
        assert!(matches!(err, ComposeError::Encoding { ref name, .. } if name == "here.pdf"));
    }

    #[tokio::test]
    async fn test_size_mismatch_is_rejected() {
        let mut c = CandidateFile::from_bytes("a.txt", "text/plain", b"abc".to_vec());
        c.size = 10;
        assert!(matches!(encode(&c).await, Err(ComposeError::Encoding { .. })));
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri("QUJD"), "QUJD");
    }

    #[test]
    fn test_empty_file_encodes() {
        assert_eq!(data_uri("text/plain", b""), "data:text/plain;base64,");
    }
}
