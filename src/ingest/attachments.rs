//! Attachment ingestion.
//!
//! Each file in a batch is handled on its own: type check, budget check,
//! encode, then commit. A rejected file is recorded in the report and the
//! next file is processed. Files are encoded one after another so at most
//! one file's content is in memory at a time.

use tracing::info;

use crate::error::{ComposeError, Result};
use crate::ingest::budget::Admission;
use crate::ingest::encoder::{self, CandidateFile};
use crate::ingest::mime;
use crate::ingest::report::{IngestReport, Target};
use crate::ingest::session::IngestionSession;
use crate::model::attachment::EncodedFile;

/// Ingest a batch of attachment candidates into `session`.
///
/// The progress callback receives `(current, total)`.
pub async fn ingest_attachments(
    session: &mut IngestionSession,
    batch: Vec<CandidateFile>,
    progress: Option<&dyn Fn(usize, usize)>,
) -> IngestReport {
    let mut report = IngestReport::default();
    let total = batch.len();

    for (i, candidate) in batch.into_iter().enumerate() {
        if let Some(cb) = progress {
            cb(i, total);
        }
        match ingest_one(session, &candidate).await {
            Ok(()) => report.accept(i, candidate.name),
            Err(e) => report.reject(Target::Attachment, e),
        }
    }
    if let Some(cb) = progress {
        cb(total, total);
    }

    report
}

async fn ingest_one(session: &mut IngestionSession, candidate: &CandidateFile) -> Result<()> {
    if !mime::is_allowed_attachment(&candidate.mime_type) {
        return Err(ComposeError::UnsupportedType {
            name: candidate.name.clone(),
            mime_type: candidate.mime_type.clone(),
        });
    }

    if let Admission::Deny { remaining } = session.budget().admit(candidate.size) {
        return Err(ComposeError::QuotaExceeded {
            name: candidate.name.clone(),
            remaining,
        });
    }

    let encoded = encoder::encode(candidate).await?;

    info!(
        name = %candidate.name,
        size = encoded.size,
        mime = %candidate.mime_type,
        "Accepted attachment"
    );
    session.accept_attachment(EncodedFile::new(
        candidate.name.clone(),
        encoded.size,
        mime::essence(&candidate.mime_type),
        encoded.data,
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str, size: usize) -> CandidateFile {
        CandidateFile::from_bytes(name, "application/pdf", vec![0u8; size])
    }

    #[tokio::test]
    async fn test_unsupported_type_does_not_block_batch() {
        let mut s = IngestionSession::new(1024);
        let batch = vec![
            CandidateFile::from_bytes("a.zip", "application/zip", vec![0; 4]),
            pdf("b.pdf", 8),
        ];
        let report = ingest_attachments(&mut s, batch, None).await;
        assert_eq!(report.accepted_names(), vec!["b.pdf"]);
        assert!(matches!(
            report.rejected[0].error,
            ComposeError::UnsupportedType { .. }
        ));
        assert_eq!(s.total_bytes(), 8);
    }

    #[tokio::test]
    async fn test_failed_encode_consumes_no_budget() {
        let mut s = IngestionSession::new(1024);
        let mut broken = pdf("broken.pdf", 4);
        broken.size = 100;
        let report = ingest_attachments(&mut s, vec![broken, pdf("ok.pdf", 10)], None).await;
        assert_eq!(report.rejected.len(), 1);
        assert!(matches!(report.rejected[0].error, ComposeError::Encoding { .. }));
        assert_eq!(s.total_bytes(), 10);
        assert_eq!(s.attachments().len(), 1);
    }

    #[tokio::test]
    async fn test_quota_reports_remaining_and_later_small_file_fits() {
        let mut s = IngestionSession::new(100);
        let batch = vec![pdf("a.pdf", 70), pdf("b.pdf", 40), pdf("c.pdf", 30)];
        let report = ingest_attachments(&mut s, batch, None).await;
        assert_eq!(report.accepted_names(), vec!["a.pdf", "c.pdf"]);
        assert!(matches!(
            report.rejected[0].error,
            ComposeError::QuotaExceeded { remaining: 30, .. }
        ));
        assert_eq!(s.total_bytes(), 100);
    }

    #[tokio::test]
    async fn test_identical_files_are_not_deduplicated() {
        let mut s = IngestionSession::new(100);
        ingest_attachments(&mut s, vec![pdf("a.pdf", 10), pdf("a.pdf", 10)], None).await;
        assert_eq!(s.attachments().len(), 2);
        assert_eq!(s.total_bytes(), 20);
    }

    #[tokio::test]
    async fn test_progress_reaches_total() {
        use std::cell::Cell;
        let last = Cell::new((0, 0));
        let mut s = IngestionSession::new(100);
        let cb = |cur: usize, total: usize| last.set((cur, total));
        ingest_attachments(&mut s, vec![pdf("a.pdf", 1), pdf("b.pdf", 1)], Some(&cb)).await;
        assert_eq!(last.get(), (2, 2));
    }
}
