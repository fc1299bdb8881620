//! Attachment and inline image ingestion.

pub mod attachments;
pub mod budget;
pub mod encoder;
pub mod images;
pub mod mime;
pub mod report;
pub mod session;

pub use attachments::ingest_attachments;
pub use encoder::CandidateFile;
pub use session::IngestionSession;
