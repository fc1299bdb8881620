//! The operator's compose request, one variant per email mode.

use std::fmt;

/// Email construction strategy, exactly one per submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailMode {
    Text,
    Html,
    AutoGenerate,
}

impl fmt::Display for EmailMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::AutoGenerate => "auto-generate",
        };
        f.write_str(s)
    }
}

/// Body content, carrying only the fields its mode uses.
#[derive(Debug, Clone, PartialEq)]
pub enum EmailBody {
    /// Plain text plus an optional HTML alternative. Files are never sent.
    Text { text: String, html: String },
    /// Raw HTML supplied by the operator, sent verbatim.
    Html { html: String },
    /// HTML synthesised from a free-text description.
    AutoGenerate { prompt: String },
}

impl EmailBody {
    pub fn mode(&self) -> EmailMode {
        match self {
            Self::Text { .. } => EmailMode::Text,
            Self::Html { .. } => EmailMode::Html,
            Self::AutoGenerate { .. } => EmailMode::AutoGenerate,
        }
    }
}

/// Validated form fields for one submission.
///
/// Recipient fields hold the raw comma/semicolon separated text; they are
/// normalised during assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeRequest {
    pub source: String,
    pub from: String,
    pub subject: String,
    pub to: String,
    pub cc: String,
    pub bcc: String,
    pub template_id: String,
    pub body: EmailBody,
}

impl ComposeRequest {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: EmailBody,
    ) -> Self {
        Self {
            source: String::new(),
            from: from.into(),
            subject: subject.into(),
            to: to.into(),
            cc: String::new(),
            bcc: String::new(),
            template_id: String::new(),
            body,
        }
    }

    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = cc.into();
        self
    }

    pub fn with_bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc = bcc.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = template_id.into();
        self
    }

    pub fn mode(&self) -> EmailMode {
        self.body.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_follows_body_variant() {
        let r = ComposeRequest::new(
            "me@x.com",
            "you@x.com",
            "Hi",
            EmailBody::AutoGenerate {
                prompt: "hello".into(),
            },
        )
        .with_cc("c@x.com");
        assert_eq!(r.mode(), EmailMode::AutoGenerate);
        assert_eq!(r.cc, "c@x.com");
        assert_eq!(r.mode().to_string(), "auto-generate");
    }
}
