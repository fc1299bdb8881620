//! CLI entry point for `mailcompose`.

use std::path::PathBuf;

use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};

use mailcompose::compose::{self, ComposeRequest, EmailBody};
use mailcompose::config::{self, Config};
use mailcompose::error::ComposeError;
use mailcompose::i18n;
use mailcompose::ingest::report::IngestReport;
use mailcompose::ingest::{ingest_attachments, CandidateFile, IngestionSession};
use mailcompose::transport::TransmissionClient;

#[derive(Parser)]
#[command(name = "mailcompose", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Language (en, es). Defaults to system locale.
    #[arg(long, value_name = "LANG", global = true)]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest files, assemble the request and send it
    Send(SendArgs),
    /// Print the HTML generated from a description
    Preview {
        /// Free-text description of the email
        #[arg(long)]
        prompt: String,
        /// Inline image, optionally renamed: PATH[=NAME]
        #[arg(long = "image", value_name = "PATH[=NAME]")]
        images: Vec<String>,
    },
    /// Show or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Text,
    Html,
    Auto,
}

#[derive(Args)]
struct SendArgs {
    /// Email mode
    #[arg(long, value_enum, default_value = "html")]
    mode: ModeArg,
    #[arg(long)]
    from: String,
    /// Recipients, separated by commas or semicolons
    #[arg(long)]
    to: String,
    #[arg(long, default_value = "")]
    cc: String,
    #[arg(long, default_value = "")]
    bcc: String,
    #[arg(long)]
    subject: String,
    /// Plain-text body (text mode)
    #[arg(long)]
    text: Option<String>,
    /// HTML body given inline
    #[arg(long, conflicts_with = "html_file")]
    html: Option<String>,
    /// HTML body read from a file
    #[arg(long, value_name = "FILE")]
    html_file: Option<PathBuf>,
    /// Description used to generate the HTML (auto mode)
    #[arg(long)]
    prompt: Option<String>,
    /// Attachment, optionally renamed: PATH[=NAME]
    #[arg(long = "attach", value_name = "PATH[=NAME]")]
    attachments: Vec<String>,
    /// Inline image, optionally renamed: PATH[=NAME]
    #[arg(long = "image", value_name = "PATH[=NAME]")]
    images: Vec<String>,
    /// Template identifier (defaults to the configured one)
    #[arg(long)]
    template_id: Option<String>,
    /// Delivery service base URL (overrides config and environment)
    #[arg(long)]
    base_url: Option<String>,
    /// Print the payload as JSON instead of sending it
    #[arg(long)]
    dry_run: bool,
}

/// Detect language early from --lang arg or system env, before clap processes --help.
fn detect_lang_early() -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--lang" {
            if let Some(lang) = args.get(i + 1).and_then(|c| i18n::Lang::from_code(c)) {
                return lang;
            }
        }
        if let Some(lang) = args[i]
            .strip_prefix("--lang=")
            .and_then(i18n::Lang::from_code)
        {
            return lang;
        }
    }
    i18n::detect_system_lang()
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command().about(i18n::app_about());

    let subcommands: Vec<clap::Command> = cmd
        .get_subcommands()
        .map(|sub| {
            let s = sub.clone();
            match s.get_name() {
                "send" => s.about(i18n::help_cmd_send()),
                "preview" => s.about(i18n::help_cmd_preview()),
                "config" => s.about(i18n::help_cmd_config()),
                "completions" => s.about(i18n::help_cmd_completions()),
                "manpage" => s.about(i18n::help_cmd_manpage()),
                _ => s,
            }
        })
        .collect();

    for sub in subcommands {
        cmd = cmd.mut_subcommand(sub.get_name(), |_| sub.clone());
    }

    cmd
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    i18n::set_lang(detect_lang_early());

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let config = config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Send(args) => cmd_send(args, &config).await,
        Commands::Preview { prompt, images } => cmd_preview(&prompt, &images).await,
        Commands::Config { action } => cmd_config(action, &config),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mailcompose.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Split `PATH[=NAME]` into the path and an optional new name.
fn parse_file_spec(spec: &str) -> (PathBuf, Option<String>) {
    match spec.rsplit_once('=') {
        Some((path, name)) if !path.is_empty() && !name.is_empty() && !name.contains(['/', '\\']) => {
            (PathBuf::from(path), Some(name.to_string()))
        }
        _ => (PathBuf::from(spec), None),
    }
}

/// Turn file specs into candidates plus the requested renames, in order.
async fn candidates(specs: &[String]) -> (Vec<CandidateFile>, Vec<Option<String>>) {
    let mut files = Vec::with_capacity(specs.len());
    let mut renames = Vec::with_capacity(specs.len());
    for spec in specs {
        let (path, rename) = parse_file_spec(spec);
        files.push(CandidateFile::from_path(&path).await);
        renames.push(rename);
    }
    (files, renames)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}}",
                i18n::cli_ingesting()
            ))
            .expect("valid template")
            .progress_chars("#>-"),
    );
    pb
}

fn print_rejections(report: &IngestReport) {
    for rejection in &report.rejected {
        eprintln!("  \u{2717} {}: {}", rejection.title(), rejection.description());
    }
}

/// Ingest attachments and images from the command line into a fresh session.
async fn build_session(
    config: &Config,
    attachments: &[String],
    images: &[String],
) -> anyhow::Result<IngestionSession> {
    let mut session = IngestionSession::from_config(config);

    if !attachments.is_empty() {
        let (batch, renames) = candidates(attachments).await;
        let pb = progress_bar(batch.len());
        let start = session.attachments().len();
        let report = ingest_attachments(
            &mut session,
            batch,
            Some(&|current, total| {
                pb.set_length(total as u64);
                pb.set_position(current as u64);
            }),
        )
        .await;
        pb.finish_and_clear();

        for (offset, accepted) in report.accepted.iter().enumerate() {
            if let Some(name) = &renames[accepted.position] {
                session.rename_attachment(start + offset, name.clone())?;
            }
        }
        for file in &session.attachments()[start..] {
            println!(
                "  \u{2713} {}: {} ({})",
                i18n::cli_attached(),
                file.name,
                format_size(file.size, BINARY)
            );
        }
        print_rejections(&report);
        println!(
            "{}: {} ({} {})",
            i18n::cli_total(),
            format_size(session.total_bytes(), BINARY),
            format_size(session.remaining(), BINARY),
            i18n::cli_remaining()
        );
    }

    if !images.is_empty() {
        let (batch, renames) = candidates(images).await;
        let start = session.images().len();
        let report = session.images_mut().ingest(batch, None).await;
        for (offset, accepted) in report.accepted.iter().enumerate() {
            if let Some(name) = &renames[accepted.position] {
                session.images_mut().rename(start + offset, name.clone())?;
            }
        }
        for image in &session.images().as_slice()[start..] {
            println!(
                "  \u{2713} {}: {} \u{2192} {}",
                i18n::cli_inline_image(),
                image.filename,
                image.reference()
            );
        }
        print_rejections(&report);
    }

    Ok(session)
}

fn body_from_args(args: &SendArgs) -> anyhow::Result<EmailBody> {
    let html = match (&args.html, &args.html_file) {
        (Some(html), _) => Some(html.clone()),
        (None, Some(path)) => {
            Some(std::fs::read_to_string(path).map_err(|e| ComposeError::io(path, e))?)
        }
        (None, None) => None,
    };

    let body = match args.mode {
        ModeArg::Text => EmailBody::Text {
            text: args.text.clone().unwrap_or_default(),
            html: html.unwrap_or_default(),
        },
        ModeArg::Html => EmailBody::Html {
            html: html.ok_or_else(|| anyhow::anyhow!(i18n::err_missing_body()))?,
        },
        ModeArg::Auto => EmailBody::AutoGenerate {
            prompt: args
                .prompt
                .clone()
                .ok_or_else(|| anyhow::anyhow!(i18n::err_missing_body()))?,
        },
    };
    Ok(body)
}

async fn cmd_send(args: SendArgs, config: &Config) -> anyhow::Result<()> {
    let body = body_from_args(&args)?;
    let request = ComposeRequest::new(&args.from, &args.to, &args.subject, body)
        .with_cc(&args.cc)
        .with_bcc(&args.bcc)
        .with_source(&config.transport.source)
        .with_template_id(
            args.template_id
                .clone()
                .unwrap_or_else(|| config.compose.template_id.clone()),
        );

    let mut session = build_session(config, &args.attachments, &args.images).await?;

    if compose::apply_text_mode_policy(config.compose.text_mode_files, &request, &mut session)
        .is_some()
    {
        eprintln!("\u{26a0} {}", i18n::cli_text_mode_files());
    }

    let payload = compose::assemble(&request, &session)?;

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let client = TransmissionClient::from_config(config, args.base_url.as_deref())?;
    match client.send(&payload).await {
        Ok(response) => {
            session.reset();
            println!("{} ({})", i18n::cli_sent(), payload.txn_ref_no);
            if !response.is_null() {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {e}", i18n::cli_send_failed());
            Err(e.into())
        }
    }
}

async fn cmd_preview(prompt: &str, images: &[String]) -> anyhow::Result<()> {
    let mut session = IngestionSession::new(0);
    let (batch, renames) = candidates(images).await;
    let report = session.images_mut().ingest(batch, None).await;
    for (offset, accepted) in report.accepted.iter().enumerate() {
        if let Some(name) = &renames[accepted.position] {
            session.images_mut().rename(offset, name.clone())?;
        }
    }
    print_rejections(&report);
    print!(
        "{}",
        compose::template::synthesize(prompt, session.images().as_slice())
    );
    Ok(())
}

fn cmd_config(action: ConfigAction, config: &Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Init => {
            let path = config::save_config(&Config::default())?;
            println!("{} {}", i18n::cli_config_saved(), path.display());
        }
    }
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailcompose", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_spec_with_rename() {
        let (p, n) = parse_file_spec("docs/report.pdf=Q3 report.pdf");
        assert_eq!(p, PathBuf::from("docs/report.pdf"));
        assert_eq!(n.as_deref(), Some("Q3 report.pdf"));
    }

    #[test]
    fn test_parse_file_spec_plain_and_path_with_equals() {
        assert_eq!(parse_file_spec("a.pdf"), (PathBuf::from("a.pdf"), None));
        assert_eq!(
            parse_file_spec("x=y/a.pdf"),
            (PathBuf::from("x=y/a.pdf"), None)
        );
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
