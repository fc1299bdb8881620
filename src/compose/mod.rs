//! Request modelling, HTML synthesis and payload assembly.

pub mod assemble;
pub mod request;
pub mod template;
pub mod txn;

pub use assemble::{apply_text_mode_policy, assemble, ExcludedFiles};
pub use request::{ComposeRequest, EmailBody, EmailMode};
