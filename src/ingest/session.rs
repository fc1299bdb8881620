//! The compose session: accepted attachments, inline images and the
//! attachment byte budget.
//!
//! A session is created when composing starts and owned by the caller; it is
//! passed by reference into ingestion and assembly. Nothing is shared or
//! global, and all mutation happens in call order.

use tracing::info;

use crate::error::{ComposeError, Result};
use crate::ingest::budget::SizeBudget;
use crate::ingest::images::InlineImageRegistry;
use crate::model::attachment::EncodedFile;

#[derive(Debug, Clone)]
pub struct IngestionSession {
    attachments: Vec<EncodedFile>,
    images: InlineImageRegistry,
    budget: SizeBudget,
}

impl IngestionSession {
    /// Start an empty session with the given attachment cap in bytes.
    pub fn new(attachment_cap: u64) -> Self {
        Self {
            attachments: Vec::new(),
            images: InlineImageRegistry::new(),
            budget: SizeBudget::new(attachment_cap),
        }
    }

    /// Start an empty session using the configured cap.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.limits.attachment_cap_bytes)
    }

    pub fn attachments(&self) -> &[EncodedFile] {
        &self.attachments
    }

    pub fn images(&self) -> &InlineImageRegistry {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut InlineImageRegistry {
        &mut self.images
    }

    pub fn budget(&self) -> &SizeBudget {
        &self.budget
    }

    /// Sum of accepted attachment sizes. Inline images are not included.
    pub fn total_bytes(&self) -> u64 {
        self.budget.total()
    }

    pub fn remaining(&self) -> u64 {
        self.budget.remaining()
    }

    /// `true` when neither attachments nor inline images are held.
    pub fn has_no_files(&self) -> bool {
        self.attachments.is_empty() && self.images.is_empty()
    }

    /// Record a successfully encoded attachment and charge its size.
    pub(crate) fn accept_attachment(&mut self, file: EncodedFile) {
        self.budget.commit(file.size);
        self.attachments.push(file);
    }

    /// Remove an attachment and give its size back to the budget.
    pub fn remove_attachment(&mut self, index: usize) -> Result<EncodedFile> {
        if index >= self.attachments.len() {
            return Err(ComposeError::InvalidIndex {
                index,
                len: self.attachments.len(),
            });
        }
        let file = self.attachments.remove(index);
        self.budget.release(file.size);
        info!(
            name = %file.name,
            original = %file.original_name(),
            size = file.size,
            "Removed attachment"
        );
        Ok(file)
    }

    /// Rename an attachment. The budget is unaffected.
    pub fn rename_attachment(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let len = self.attachments.len();
        let file = self
            .attachments
            .get_mut(index)
            .ok_or(ComposeError::InvalidIndex { index, len })?;
        file.name = name.into();
        Ok(())
    }

    /// Drop every attachment and inline image, e.g. after a successful send.
    pub fn reset(&mut self) {
        self.attachments.clear();
        self.images.clear();
        self.budget.reset();
    }
}
