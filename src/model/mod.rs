//! Core data model types: recipients, encoded files, and the outbound payload.

pub mod address;
pub mod attachment;
pub mod payload;
