//! Inline image registry.
//!
//! Images are addressed from HTML through `cid:img@<filename>`. The filename
//! is editable, and every reference is computed from the current filename at
//! the time it is requested.
//!
//! Unlike attachments, inline images are only checked for an `image/*` type
//! and do not count against the session's byte budget.

use tracing::info;

use crate::error::{ComposeError, Result};
use crate::ingest::encoder::{self, CandidateFile};
use crate::ingest::mime;
use crate::ingest::report::{IngestReport, Target};
use crate::model::attachment::InlineImage;

/// Prefix of every inline image content identifier.
pub const CID_PREFIX: &str = "cid:img@";

/// Content-identifier reference for an image filename.
pub fn reference_for(filename: &str) -> String {
    format!("{CID_PREFIX}{filename}")
}

/// Ordered collection of inline images.
#[derive(Debug, Clone, Default)]
pub struct InlineImageRegistry {
    images: Vec<InlineImage>,
}

impl InlineImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[InlineImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// First image whose filename contains `needle`, ignoring case.
    pub fn find_containing(&self, needle: &str) -> Option<&InlineImage> {
        find_containing(&self.images, needle)
    }

    /// Change an image's lookup key in place.
    pub fn rename(&mut self, index: usize, filename: impl Into<String>) -> Result<()> {
        let len = self.images.len();
        let image = self
            .images
            .get_mut(index)
            .ok_or(ComposeError::InvalidIndex { index, len })?;
        image.filename = filename.into();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<InlineImage> {
        if index >= self.images.len() {
            return Err(ComposeError::InvalidIndex {
                index,
                len: self.images.len(),
            });
        }
        Ok(self.images.remove(index))
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Ingest a batch of images, one file at a time.
    ///
    /// Non-image files are rejected; everything else in the batch is still
    /// processed.
    pub async fn ingest(
        &mut self,
        batch: Vec<CandidateFile>,
        progress: Option<&dyn Fn(usize, usize)>,
    ) -> IngestReport {
        let mut report = IngestReport::default();
        let total = batch.len();

        for (i, candidate) in batch.into_iter().enumerate() {
            if let Some(cb) = progress {
                cb(i, total);
            }
            match self.ingest_one(&candidate).await {
                Ok(()) => report.accept(i, candidate.name),
                Err(e) => report.reject(Target::InlineImage, e),
            }
        }
        if let Some(cb) = progress {
            cb(total, total);
        }

        report
    }

    async fn ingest_one(&mut self, candidate: &CandidateFile) -> Result<()> {
        if !mime::is_image(&candidate.mime_type) {
            return Err(ComposeError::UnsupportedType {
                name: candidate.name.clone(),
                mime_type: candidate.mime_type.clone(),
            });
        }
        let encoded = encoder::encode(candidate).await?;
        info!(name = %candidate.name, size = encoded.size, "Registered inline image");
        self.images
            .push(InlineImage::new(candidate.name.clone(), encoded.data));
        Ok(())
    }
}

/// First image in `images` whose filename contains `needle`, ignoring case.
pub fn find_containing<'a>(images: &'a [InlineImage], needle: &str) -> Option<&'a InlineImage> {
    let needle = needle.to_lowercase();
    images
        .iter()
        .find(|img| img.filename.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> CandidateFile {
        CandidateFile::from_bytes(name, "image/png", vec![1, 2, 3])
    }

    #[tokio::test]
    async fn test_non_image_rejected_batch_continues() {
        let mut reg = InlineImageRegistry::new();
        let batch = vec![
            png("a.png"),
            CandidateFile::from_bytes("doc.pdf", "application/pdf", vec![0]),
            png("b.png"),
        ];
        let report = reg.ingest(batch, None).await;
        assert_eq!(report.accepted_names(), vec!["a.png", "b.png"]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].file(), "doc.pdf");
        assert_eq!(reg.len(), 2);
    }

    #[tokio::test]
    async fn test_rename_changes_reference() {
        let mut reg = InlineImageRegistry::new();
        reg.ingest(vec![png("logo.png")], None).await;
        reg.rename(0, "header-logo.png").unwrap();
        assert_eq!(reg.as_slice()[0].reference(), "cid:img@header-logo.png");
        assert_eq!(reg.as_slice()[0].original_name(), "logo.png");
    }

    #[test]
    fn test_find_is_case_insensitive_first_wins() {
        let images = vec![
            InlineImage::new("logo.png", String::new()),
            InlineImage::new("Big-HEADER.jpg", String::new()),
            InlineImage::new("header2.png", String::new()),
        ];
        let found = find_containing(&images, "header").unwrap();
        assert_eq!(found.filename, "Big-HEADER.jpg");
        assert!(find_containing(&images, "footer").is_none());
    }

    #[test]
    fn test_out_of_range_mutations() {
        let mut reg = InlineImageRegistry::new();
        assert!(matches!(
            reg.remove(0),
            Err(ComposeError::InvalidIndex { index: 0, len: 0 })
        ));
        assert!(reg.rename(3, "x.png").is_err());
    }
}
