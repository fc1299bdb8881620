//! Payload assembly: request + session → outbound [`Payload`].
//!
//! Assembly reads the session but never changes it. Image filenames and
//! attachment names are read here, at assembly time, so renames made after
//! upload are reflected in both the HTML references and the file lists.

use tracing::{debug, error, warn};

use crate::compose::request::{ComposeRequest, EmailBody, EmailMode};
use crate::compose::template;
use crate::compose::txn;
use crate::config::TextModeFiles;
use crate::error::Result;
use crate::ingest::session::IngestionSession;
use crate::model::address::normalize_recipients;
use crate::model::payload::{AdditionalInfo, MessageFields, Payload, WireAttachment, WireImage};

/// Files held by the session that a text-mode send will not transmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludedFiles {
    pub attachments: usize,
    pub images: usize,
}

/// Assemble the payload with a freshly generated transaction reference.
pub fn assemble(request: &ComposeRequest, session: &IngestionSession) -> Result<Payload> {
    assemble_with_ref(request, session, txn::generate())
}

/// Assemble the payload with a caller-supplied transaction reference.
pub fn assemble_with_ref(
    request: &ComposeRequest,
    session: &IngestionSession,
    txn_ref_no: String,
) -> Result<Payload> {
    let mode = request.mode();

    let (html, text) = match &request.body {
        EmailBody::Text { text, html } => (Some(html.clone()), Some(text.clone())),
        EmailBody::Html { html } => (Some(html.clone()), None),
        EmailBody::AutoGenerate { prompt } => (
            Some(template::synthesize(prompt, session.images().as_slice())),
            None,
        ),
    };

    let (html_images, attachment_files) = match mode {
        EmailMode::Text => {
            if let Some(excluded) = excluded_in_text_mode(request, session) {
                warn!(
                    attachments = excluded.attachments,
                    images = excluded.images,
                    "Text mode: session files are not transmitted"
                );
            }
            (None, None)
        }
        EmailMode::Html | EmailMode::AutoGenerate => (wire_images(session), wire_attachments(session)),
    };

    let payload = Payload {
        txn_ref_no,
        source: request.source.clone(),
        payload: MessageFields {
            from: request.from.trim().to_string(),
            subject: request.subject.clone(),
            to: normalize_recipients(&request.to),
            cc: non_empty(normalize_recipients(&request.cc)),
            bcc: non_empty(normalize_recipients(&request.bcc)),
            html,
            text,
        },
        additional_info: AdditionalInfo {
            template_id: request.template_id.clone(),
            is_text: mode == EmailMode::Text,
            html_images,
            attachment_files,
        },
    };

    if let Err(e) = payload.check_invariants() {
        error!(error = %e, mode = %mode, "Assembled payload failed invariant check");
        return Err(e);
    }

    debug!(
        txn = %payload.txn_ref_no,
        mode = %mode,
        images = payload.additional_info.html_images.as_ref().map_or(0, Vec::len),
        attachments = payload.additional_info.attachment_files.as_ref().map_or(0, Vec::len),
        "Assembled payload"
    );
    Ok(payload)
}

/// Counts of session files a text-mode request would leave behind, if any.
pub fn excluded_in_text_mode(
    request: &ComposeRequest,
    session: &IngestionSession,
) -> Option<ExcludedFiles> {
    if request.mode() != EmailMode::Text || session.has_no_files() {
        return None;
    }
    Some(ExcludedFiles {
        attachments: session.attachments().len(),
        images: session.images().len(),
    })
}

/// Apply the configured text-mode policy before assembly.
///
/// Returns the excluded counts when the operator should be warned.
pub fn apply_text_mode_policy(
    policy: TextModeFiles,
    request: &ComposeRequest,
    session: &mut IngestionSession,
) -> Option<ExcludedFiles> {
    let excluded = excluded_in_text_mode(request, session)?;
    match policy {
        TextModeFiles::Keep => None,
        TextModeFiles::Warn => Some(excluded),
        TextModeFiles::Clear => {
            debug!(
                attachments = excluded.attachments,
                images = excluded.images,
                "Clearing session files for text mode"
            );
            session.reset();
            None
        }
    }
}

fn wire_images(session: &IngestionSession) -> Option<Vec<WireImage>> {
    let images: Vec<WireImage> = session
        .images()
        .as_slice()
        .iter()
        .map(|img| WireImage {
            filename: img.filename.clone(),
            data: img.data.clone(),
        })
        .collect();
    (!images.is_empty()).then_some(images)
}

fn wire_attachments(session: &IngestionSession) -> Option<Vec<WireAttachment>> {
    let files: Vec<WireAttachment> = session
        .attachments()
        .iter()
        .map(|f| WireAttachment {
            filename: f.name.clone(),
            mime_type: f.mime_type.clone(),
            size: f.size,
            data: f.data.clone(),
        })
        .collect();
    (!files.is_empty()).then_some(files)
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
