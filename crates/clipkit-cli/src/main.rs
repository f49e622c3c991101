//! ClipKit CLI - Read a URL and save it as a Markdown note

use clap::{Parser, ValueEnum};
use clipkit::{
    format_note, sync_read_result, validate_url, ReadResult, ReaderConfig, SmartReader, Strategy,
    DEFAULT_FOLDER,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for the note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown note
    #[default]
    Md,
    /// JSON read result
    Json,
}

/// ClipKit - read web pages through Jina, Firecrawl or a headless browser
#[derive(Parser, Debug)]
#[command(name = "clipkit")]
#[command(author, about, long_about = None)]
struct Cli {
    /// URL to read
    url: String,

    /// Vault directory to save the note into
    #[arg(long, short = 'v', env = "OBSIDIAN_VAULT_PATH")]
    vault: Option<PathBuf>,

    /// Folder inside the vault
    #[arg(long, short = 'f', default_value = DEFAULT_FOLDER)]
    folder: String,

    /// Strategies to try, in order (jina, firecrawl, browser)
    #[arg(long, short = 's', num_args = 1..)]
    strategy: Option<Vec<Strategy>>,

    /// Saved browser session (Playwright storage-state JSON)
    #[arg(long, value_name = "FILE")]
    storage_state: Option<PathBuf>,

    /// Write the output to this file instead of the vault or stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "md")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'V')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = validate_url(&cli.url) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut config = ReaderConfig::from_env();
    if let Some(ref path) = cli.storage_state {
        config = config.storage_state(path);
    }
    let reader = SmartReader::from_config(&config);
    debug!(url = %cli.url, strategies = ?cli.strategy, vault = ?cli.vault, "Reading URL");

    let result = match reader.read(&cli.url, cli.strategy.as_deref()).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rendered = match render(&result, cli.format) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match destination(&cli) {
        Destination::File(path) => {
            if let Err(e) = std::fs::write(path, &rendered) {
                eprintln!("Error writing {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            eprintln!("Saved to {}", path.display());
        }
        Destination::Vault(root) => match sync_read_result(&result, root, &cli.folder) {
            Ok(path) => eprintln!("Saved to {}", path.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        Destination::Stdout => writeln_safe(&rendered),
    }

    ExitCode::SUCCESS
}

/// Filter used when `RUST_LOG` is not set
///
/// Without `--verbose` only errors are shown, so strategies that fail before
/// a later one succeeds stay quiet.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "clipkit=debug,clipkit_cli=debug"
    } else {
        "error"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn render(result: &ReadResult, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Md => Ok(format_note(result)),
        OutputFormat::Json => serde_json::to_string_pretty(result),
    }
}

/// Where the output goes
#[derive(Debug, PartialEq, Eq)]
enum Destination<'a> {
    File(&'a Path),
    Vault(&'a Path),
    Stdout,
}

/// `--output` beats the vault, which beats stdout
fn destination(cli: &Cli) -> Destination<'_> {
    if let Some(ref path) = cli.output {
        Destination::File(path)
    } else if let Some(ref root) = cli.vault {
        Destination::Vault(root)
    } else {
        Destination::Stdout
    }
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
