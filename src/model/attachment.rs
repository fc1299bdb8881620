//! Encoded attachments and inline images held by a compose session.
//!
//! Content is stored already encoded as data-URI prefixed base64 text, the
//! form the delivery service consumes.

/// A file accepted into the attachment list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EncodedFile {
    /// Current filename. Editable by the operator after ingestion.
    pub name: String,

    /// Size of the original content in bytes.
    pub size: u64,

    /// MIME content type (e.g. `"application/pdf"`).
    pub mime_type: String,

    /// `data:<mime>;base64,<payload>` text encoding exactly `size` bytes.
    pub data: String,

    /// Filename at ingestion time. Never changes; used for diagnostics only.
    original_name: String,
}

impl EncodedFile {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>, data: String) -> Self {
        let name = name.into();
        Self {
            original_name: name.clone(),
            name,
            size,
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Filename the file had when it was ingested.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }
}

/// An image registered for inline (`cid:`) reference from HTML bodies.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InlineImage {
    /// Lookup key for the content identifier. Renaming it changes the
    /// reference emitted at assembly time.
    pub filename: String,

    /// `data:<mime>;base64,<payload>` text.
    pub data: String,

    /// Filename at ingestion time.
    original_name: String,
}

impl InlineImage {
    pub fn new(filename: impl Into<String>, data: String) -> Self {
        let filename = filename.into();
        Self {
            original_name: filename.clone(),
            filename,
            data,
        }
    }

    /// Filename the image had when it was ingested.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Content-identifier reference for the image's current filename.
    pub fn reference(&self) -> String {
        crate::ingest::images::reference_for(&self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_keeps_original_name() {
        let mut f = EncodedFile::new("a.pdf", 3, "application/pdf", "data:application/pdf;base64,AAAA".into());
        f.name = "renamed.pdf".to_string();
        assert_eq!(f.original_name(), "a.pdf");
        assert_eq!(f.name, "renamed.pdf");
    }

    #[test]
    fn test_image_reference_tracks_current_filename() {
        let mut img = InlineImage::new("logo.png", String::new());
        assert_eq!(img.reference(), "cid:img@logo.png");
        img.filename = "header.png".to_string();
        assert_eq!(img.reference(), "cid:img@header.png");
        assert_eq!(img.original_name(), "logo.png");
    }
}
