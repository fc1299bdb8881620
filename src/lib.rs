//! `mailcompose`: compose email requests for a remote delivery service.
//!
//! This crate provides the attachment ingestion pipeline (encoding, MIME
//! allow-listing, attachment budget, inline image registry), HTML synthesis
//! for the auto-generate mode, payload assembly and the HTTP client that
//! hands the payload to the service.

pub mod compose;
pub mod config;
pub mod error;
pub mod i18n;
pub mod ingest;
pub mod model;
pub mod transport;
