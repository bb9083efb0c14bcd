//! # querypad
//!
//! A terminal SQL query pad with live syntax highlighting, a connection
//! sidebar and a filterable results grid.

mod cli;
mod tui;

use clap::{Parser, ValueEnum};
use querypad::app::AppConfig;
use querypad::highlight::CommentPolicy;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Output format for CLI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Aligned text table.
    Table,
    /// Comma-separated values.
    Csv,
    /// JSON array of objects.
    Json,
}

/// When to color highlighted SQL in CLI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Never emit ANSI colors.
    Never,
}

/// Where `--` starts a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CommentMode {
    /// At any position outside a string literal.
    Anywhere,
    /// Only at the start of a line.
    LineStart,
}

impl From<CommentMode> for CommentPolicy {
    fn from(mode: CommentMode) -> Self {
        match mode {
            CommentMode::Anywhere => CommentPolicy::Anywhere,
            CommentMode::LineStart => CommentPolicy::LineStart,
        }
    }
}

/// querypad: SQL query pad
#[derive(Parser, Debug, Clone)]
#[command(
    name = "querypad",
    version,
    about = "querypad — SQL query pad with live syntax highlighting"
)]
pub struct Args {
    /// Non-interactive CLI mode
    #[arg(long = "cli")]
    pub cli_mode: bool,

    /// Read SQL from file
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Write results to file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format for results
    #[arg(long = "format", value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Only output rows containing this text (case-insensitive)
    #[arg(long = "filter")]
    pub filter: Option<String>,

    /// Color highlighted SQL in CLI mode
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Print the highlighted SQL only, without executing it
    #[arg(long = "highlight-only")]
    pub highlight_only: bool,

    /// Connection to activate on startup
    #[arg(short = 'c', long = "connection")]
    pub connection: Option<String>,

    /// Where `--` starts a comment
    #[arg(
        long = "comment-policy",
        env = "QUERYPAD_COMMENT_POLICY",
        value_enum,
        default_value_t = CommentMode::Anywhere
    )]
    pub comment_policy: CommentMode,

    /// Directory for exported results
    #[arg(long = "export-dir", default_value = ".")]
    pub export_dir: PathBuf,

    /// Write logs to this file (TUI mode logs nowhere otherwise)
    #[arg(long = "log-file", env = "QUERYPAD_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Startup options for the TUI.
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            connection: self.connection.clone(),
            comment_policy: self.comment_policy.into(),
            export_dir: self.export_dir.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Determine if we should run in CLI mode:
    // --cli flag, piped stdin, or -i flag
    let is_piped = atty_check();
    let cli_mode = args.cli_mode || is_piped || args.input.is_some();
    init_logging(&args, cli_mode)?;

    if cli_mode {
        cli::run(args).await?;
    } else {
        tui::run(args).await?;
    }

    Ok(())
}

/// Install the tracing subscriber.
///
/// CLI mode logs to stderr. The TUI owns the terminal, so it only logs
/// when `--log-file` is given.
fn init_logging(args: &Args, cli_mode: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(ref path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else if cli_mode {
        builder.with_writer(std::io::stderr).init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "querypad starting");
    Ok(())
}

/// Check if stdin is NOT a terminal (i.e. input is piped).
fn atty_check() -> bool {
    use std::io::IsTerminal;
    !std::io::stdin().is_terminal()
}
