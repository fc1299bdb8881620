//! HTML synthesis for the auto-generate mode.
//!
//! This is a keyword heuristic, not a template language. A fixed skeleton
//! gets an optional header image, the prompt as the body paragraph and an
//! optional footer image. A slot is emitted when an inline image's filename
//! contains the slot keyword or the prompt mentions it; the first matching
//! image wins, and without one the slot points at `<keyword>.png`.
//!
//! The prompt is embedded without escaping, so markup in the prompt ends up
//! in the message as-is.

use crate::ingest::images::{find_containing, reference_for};
use crate::model::attachment::InlineImage;

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
body { margin: 0; padding: 0; font-family: Arial, Helvetica, sans-serif; color: #333333; }
.container { max-width: 600px; margin: 0 auto; padding: 20px; }
.header, .footer { text-align: center; }
.header img, .footer img { max-width: 100%; height: auto; }
.content { padding: 20px 0; line-height: 1.6; }
</style>
</head>
<body>
<div class="container">
"#;

const TAIL: &str = "</div>\n</body>\n</html>\n";

/// Image slots in document order: (keyword, css class, alt text).
const SLOTS: [(&str, &str, &str); 2] = [("header", "header", "Header"), ("footer", "footer", "Footer")];

/// Build an HTML document from a free-text description and the registered
/// inline images.
pub fn synthesize(prompt: &str, images: &[InlineImage]) -> String {
    let prompt_lower = prompt.to_lowercase();
    let slot = |keyword: &str| -> Option<String> {
        match find_containing(images, keyword) {
            Some(image) => Some(image.reference()),
            None if prompt_lower.contains(keyword) => Some(reference_for(&format!("{keyword}.png"))),
            None => None,
        }
    };

    let [(header_kw, header_class, header_alt), (footer_kw, footer_class, footer_alt)] = SLOTS;

    let mut html = String::with_capacity(HEAD.len() + TAIL.len() + prompt.len() + 256);
    html.push_str(HEAD);
    if let Some(src) = slot(header_kw) {
        push_image(&mut html, header_class, &src, header_alt);
    }
    html.push_str("<div class=\"content\">\n<p>");
    html.push_str(prompt);
    html.push_str("</p>\n</div>\n");
    if let Some(src) = slot(footer_kw) {
        push_image(&mut html, footer_class, &src, footer_alt);
    }
    html.push_str(TAIL);
    html
}

fn push_image(html: &mut String, class: &str, src: &str, alt: &str) {
    html.push_str(&format!(
        "<div class=\"{class}\"><img src=\"{src}\" alt=\"{alt}\"></div>\n"
    ));
}
