//! Per-file outcomes of an ingestion batch.
//!
//! Each rejection is a self-contained, localised event the operator can act
//! on individually; a batch never fails as a whole.

use humansize::{format_size, BINARY};

use crate::error::ComposeError;
use crate::i18n;

/// Which collection a file was offered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Attachment,
    InlineImage,
}

/// A single file that was not accepted.
#[derive(Debug)]
pub struct Rejection {
    pub target: Target,
    pub error: ComposeError,
}

impl Rejection {
    /// Name of the rejected file.
    pub fn file(&self) -> &str {
        error_file(&self.error)
    }

    /// Short heading for the event.
    pub fn title(&self) -> &'static str {
        match &self.error {
            ComposeError::UnsupportedType { .. } => i18n::rej_unsupported_title(),
            ComposeError::QuotaExceeded { .. } => i18n::rej_quota_title(),
            _ => i18n::rej_encoding_title(),
        }
    }

    /// Human-readable explanation naming the file.
    pub fn description(&self) -> String {
        match &self.error {
            ComposeError::UnsupportedType { name, mime_type } => {
                let tail = match self.target {
                    Target::Attachment => i18n::rej_unsupported_desc(),
                    Target::InlineImage => i18n::rej_not_image_desc(),
                };
                format!("'{name}' ({mime_type}) {tail}")
            }
            ComposeError::QuotaExceeded { name, remaining } => format!(
                "'{name}' {} {}",
                i18n::rej_quota_desc(),
                format_size(*remaining, BINARY)
            ),
            ComposeError::Encoding { name, reason } => {
                format!("'{name}' {} {reason}", i18n::rej_encoding_desc())
            }
            other => other.to_string(),
        }
    }
}

/// A file that was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Position of the file in the submitted batch.
    pub position: usize,
    pub name: String,
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Accepted files, in batch order. They were appended to the collection
    /// in this same order.
    pub accepted: Vec<Accepted>,
    /// Rejected files, in batch order.
    pub rejected: Vec<Rejection>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn accepted_names(&self) -> Vec<&str> {
        self.accepted.iter().map(|a| a.name.as_str()).collect()
    }

    pub(crate) fn accept(&mut self, position: usize, name: String) {
        self.accepted.push(Accepted { position, name });
    }

    pub(crate) fn reject(&mut self, target: Target, error: ComposeError) {
        tracing::warn!(file = %error_file(&error), error = %error, "Rejected file");
        self.rejected.push(Rejection { target, error });
    }
}

fn error_file(error: &ComposeError) -> &str {
    match error {
        ComposeError::UnsupportedType { name, .. }
        | ComposeError::QuotaExceeded { name, .. }
        | ComposeError::Encoding { name, .. } => name,
        _ => "<unknown>",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_description_reports_remaining() {
        let r = Rejection {
            target: Target::Attachment,
            error: ComposeError::QuotaExceeded {
                name: "big.pdf".into(),
                remaining: 5 * 1024 * 1024,
            },
        };
        assert_eq!(r.file(), "big.pdf");
        assert!(r.description().contains("big.pdf"));
        assert!(r.description().contains("5 MiB"));
    }

    #[test]
    fn test_image_rejection_wording_differs() {
        let err = || ComposeError::UnsupportedType {
            name: "doc.pdf".into(),
            mime_type: "application/pdf".into(),
        };
        let att = Rejection { target: Target::Attachment, error: err() };
        let img = Rejection { target: Target::InlineImage, error: err() };
        assert_eq!(att.title(), img.title());
        assert_ne!(att.description(), img.description());
    }
}
