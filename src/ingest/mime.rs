//! MIME type detection and the attachment allow-list.

use std::path::Path;

use tokio::io::AsyncReadExt;

/// Non-image types accepted as attachments.
pub const ALLOWED_DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
];

/// Fallback when nothing identifies the content.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Lower-case a content type and drop any parameters (`; charset=...`).
pub fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// `true` for any `image/*` type.
pub fn is_image(mime_type: &str) -> bool {
    essence(mime_type).starts_with("image/")
}

/// `true` if the type may be ingested as an attachment.
pub fn is_allowed_attachment(mime_type: &str) -> bool {
    let essence = essence(mime_type);
    essence.starts_with("image/") || ALLOWED_DOCUMENT_TYPES.contains(&essence.as_str())
}

/// Bytes read from the head of a file for magic-byte sniffing.
const SNIFF_LEN: u64 = 8192;

/// Determine the MIME type of a file on disk.
///
/// Magic-byte sniffing wins; the extension is consulted when the content is
/// not recognised (plain text, for instance, has no signature).
pub async fn detect(path: &Path) -> String {
    match read_prefix(path).await {
        Ok(head) => {
            if let Some(kind) = infer::get(&head) {
                return kind.mime_type().to_string();
            }
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "MIME sniffing failed");
        }
    }
    from_extension(path).unwrap_or(OCTET_STREAM).to_string()
}

async fn read_prefix(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path).await?;
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN).read_to_end(&mut head).await?;
    Ok(head)
}

/// Map a file extension to its MIME type.
pub fn from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "txt" | "text" | "log" => "text/plain",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list() {
        assert!(is_allowed_attachment("application/pdf"));
        assert!(is_allowed_attachment("image/png"));
        assert!(is_allowed_attachment("Text/Plain; charset=utf-8"));
        assert!(is_allowed_attachment(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
        assert!(!is_allowed_attachment("application/zip"));
        assert!(!is_allowed_attachment("text/html"));
        assert!(!is_allowed_attachment(""));
    }

    #[test]
    fn test_is_image_prefix_only() {
        assert!(is_image("image/svg+xml"));
        assert!(!is_image("application/pdf"));
    }

    #[test]
    fn test_extension_table() {
        assert_eq!(from_extension(Path::new("a/B.DOCX")), Some(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ));
        assert_eq!(from_extension(Path::new("notes.txt")), Some("text/plain"));
        assert_eq!(from_extension(Path::new("noext")), None);
    }

    #[tokio::test]
    async fn test_detect_sniffs_png_signature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picture.bin");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]).unwrap();
        assert_eq!(detect(&path).await, "image/png");
    }

    #[tokio::test]
    async fn test_detect_falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.txt");
        std::fs::write(&path, "hello").unwrap();
        assert_eq!(detect(&path).await, "text/plain");
    }

    #[tokio::test]
    async fn test_detect_missing_file_uses_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(detect(&dir.path().join("gone.pdf")).await, "application/pdf");
        assert_eq!(detect(&dir.path().join("gone")).await, OCTET_STREAM);
    }
}
