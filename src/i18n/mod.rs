//! Internationalization (i18n) module.
//!
//! Provides localized strings for ingestion rejections and CLI output.
//! English is the default language; Spanish is available as an alternative.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from `MAILCOMPOSE_LANG`, `LC_MESSAGES` or `LANG`.
pub fn detect_system_lang() -> Lang {
    std::env::var("MAILCOMPOSE_LANG")
        .ok()
        .and_then(|v| Lang::from_code(&v))
        .or_else(|| {
            std::env::var("LC_MESSAGES")
                .ok()
                .and_then(|v| Lang::from_code(&v))
        })
        .or_else(|| std::env::var("LANG").ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(
    app_about,
    "mailcompose \u{2014} Compose email requests with attachments and inline images and send them to a delivery service.",
    "mailcompose \u{2014} Compone peticiones de correo con adjuntos e im\u{e1}genes en l\u{ed}nea y las env\u{ed}a a un servicio de entrega."
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_cmd_send,
    "Ingest files, assemble the request and send it",
    "Cargar ficheros, montar la petici\u{f3}n y enviarla"
);
msg!(
    help_cmd_preview,
    "Print the HTML generated from a description",
    "Mostrar el HTML generado a partir de una descripci\u{f3}n"
);
msg!(
    help_cmd_config,
    "Show or initialize the configuration file",
    "Mostrar o crear el fichero de configuraci\u{f3}n"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar completions para tu shell"
);
msg!(
    help_cmd_manpage,
    "Generate a man page",
    "Generar p\u{e1}gina de manual"
);

// ── Ingestion rejections ─────────────────────────────────────────

msg!(
    rej_unsupported_title,
    "Unsupported file type",
    "Tipo de fichero no admitido"
);
msg!(
    rej_unsupported_desc,
    "is not an allowed type (images, PDF, Word, Excel, plain text).",
    "no es un tipo permitido (im\u{e1}genes, PDF, Word, Excel, texto plano)."
);
msg!(
    rej_not_image_desc,
    "is not an image and cannot be used inline.",
    "no es una imagen y no puede usarse en l\u{ed}nea."
);
msg!(
    rej_quota_title,
    "Attachment limit reached",
    "L\u{ed}mite de adjuntos alcanzado"
);
msg!(
    rej_quota_desc,
    "would exceed the attachment limit. Remaining:",
    "superar\u{ed}a el l\u{ed}mite de adjuntos. Disponible:"
);
msg!(
    rej_encoding_title,
    "Could not read file",
    "No se pudo leer el fichero"
);
msg!(
    rej_encoding_desc,
    "could not be read:",
    "no se pudo leer:"
);

// ── CLI output ───────────────────────────────────────────────────

msg!(cli_ingesting, "Reading files", "Leyendo ficheros");
msg!(cli_attached, "Attached", "Adjuntado");
msg!(cli_inline_image, "Inline image", "Imagen en l\u{ed}nea");
msg!(cli_total, "Total attachments", "Total de adjuntos");
msg!(cli_remaining, "remaining", "disponible");
msg!(
    cli_text_mode_files,
    "Text mode: attachments and inline images will not be sent",
    "Modo texto: los adjuntos y las im\u{e1}genes en l\u{ed}nea no se enviar\u{e1}n"
);
msg!(cli_sent, "Email request accepted", "Petici\u{f3}n de correo aceptada");
msg!(cli_send_failed, "Sending failed", "Fallo en el env\u{ed}o");
msg!(cli_config_saved, "Configuration written to", "Configuraci\u{f3}n guardada en");
msg!(
    err_missing_body,
    "This mode needs a body: use --html/--html-file or --prompt",
    "Este modo necesita un cuerpo: usa --html/--html-file o --prompt"
);
