//! Outbound request object accepted by the delivery service.
//!
//! Optional keys are omitted from the JSON entirely rather than sent empty:
//! the service reads an absent `cc` as "no cc requested" and an absent
//! `html_images` as "no inline images".

use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, Result};

/// The single outbound object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Time-based unique transaction reference.
    pub txn_ref_no: String,
    /// Identifier of the sending application.
    pub source: String,
    /// Message fields.
    pub payload: MessageFields,
    /// Mode and file metadata.
    pub additional_info: AdditionalInfo,
}

/// Addressing and body of the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageFields {
    pub from: String,
    pub subject: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Mode flag, template selection and transmitted files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub template_id: String,
    #[serde(rename = "isText")]
    pub is_text: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_images: Option<Vec<WireImage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_files: Option<Vec<WireAttachment>>,
}

/// Inline image entry of `additionalInfo.html_images`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireImage {
    pub filename: String,
    pub data: String,
}

/// Attachment entry of `additionalInfo.attachment_files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAttachment {
    pub filename: String,
    pub mime_type: String,
    pub size: u64,
    pub data: String,
}

impl Payload {
    /// Check the presence rules every assembled payload must satisfy.
    ///
    /// A failure here means the assembler itself is wrong, never the input.
    pub fn check_invariants(&self) -> Result<()> {
        let fields = &self.payload;
        if fields.cc.as_deref().is_some_and(str::is_empty) {
            return Err(ComposeError::AssemblyInvariant("cc present but empty".into()));
        }
        if fields.bcc.as_deref().is_some_and(str::is_empty) {
            return Err(ComposeError::AssemblyInvariant("bcc present but empty".into()));
        }

        let info = &self.additional_info;
        if info.html_images.as_ref().is_some_and(Vec::is_empty) {
            return Err(ComposeError::AssemblyInvariant(
                "html_images present but empty".into(),
            ));
        }
        if info.attachment_files.as_ref().is_some_and(Vec::is_empty) {
            return Err(ComposeError::AssemblyInvariant(
                "attachment_files present but empty".into(),
            ));
        }
        if info.is_text && (info.html_images.is_some() || info.attachment_files.is_some()) {
            return Err(ComposeError::AssemblyInvariant(
                "text mode payload carries files".into(),
            ));
        }
        if !info.is_text && fields.html.is_none() {
            return Err(ComposeError::AssemblyInvariant(
                "html mode payload has no html body".into(),
            ));
        }
        Ok(())
    }
}
