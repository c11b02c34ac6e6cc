//! CLI Application logic
//!
//! Argument parsing and the glue between config, compiler and service client.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use mdbatch_config::Config;
use mdbatch_engine::{CompileOptions, compile_markdown, extract_markdown};

use crate::service::DocsClient;
use crate::submit::{SubmitError, SubmitOutcome, apply_batch, clear_document, clear_range, insert_markdown};

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Parser)]
#[command(name = "mdbatch")]
#[command(author, version, about = "Compile Markdown into document batch updates", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ~/.config/mdbatch/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile Markdown and print the batch update requests
    Compile {
        #[command(flatten)]
        source: SourceArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Compile Markdown and insert it into a document
    Insert {
        /// Target document id
        document_id: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        service: ServiceArgs,

        /// Print the batch instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Send a prebuilt `{"requests": [...]}` file to a document
    Apply {
        /// Target document id
        document_id: String,

        /// JSON file holding the batch (`-` for stdin)
        requests: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Delete the body content of a document
    Clear {
        /// Target document id
        document_id: String,

        /// First index to delete
        #[arg(long)]
        start: Option<usize>,

        /// Index to delete up to (defaults to just before the final newline)
        #[arg(long)]
        end: Option<usize>,

        #[command(flatten)]
        service: ServiceArgs,

        /// Print the batch instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Markdown file (`-` or omitted for stdin)
    input: Option<PathBuf>,

    /// Input is a JSON body with a `markdown` field
    #[arg(long)]
    json: bool,

    /// Offset at which the first character is inserted
    #[arg(long)]
    initial_offset: Option<usize>,
}

#[derive(Args)]
struct ServiceArgs {
    /// OAuth access token for the document service
    #[arg(long, env = "MDBATCH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Document service base URL (overrides config)
    #[arg(long)]
    endpoint: Option<String>,
}

/// Run the CLI application
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Compile { source, pretty } => compile_command(&source, pretty, &config),
        Commands::Insert {
            document_id,
            source,
            service,
            dry_run,
        } => insert_command(&document_id, &source, &service, dry_run, &config),
        Commands::Apply {
            document_id,
            requests,
            service,
        } => apply_command(&document_id, &requests, &service, &config),
        Commands::Clear {
            document_id,
            start,
            end,
            service,
            dry_run,
        } => clear_command(&document_id, start, end, &service, dry_run, &config),
    }
}

fn compile_command(source: &SourceArgs, pretty: bool, config: &Config) -> Result<()> {
    let markdown = load_markdown(source)?;
    let options = compile_options(config, source.initial_offset);
    let batch = compile_markdown(&markdown, &options)?.into_batch();

    let output = if pretty {
        serde_json::to_string_pretty(&batch)?
    } else {
        serde_json::to_string(&batch)?
    };
    println!("{output}");
    Ok(())
}

fn insert_command(
    document_id: &str,
    source: &SourceArgs,
    service: &ServiceArgs,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    let markdown = load_markdown(source)?;
    let options = compile_options(config, source.initial_offset);

    if dry_run {
        let batch = compile_markdown(&markdown, &options)?.into_batch();
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    let client = connect(service, config)?;
    let outcome = submitted(insert_markdown(&client, document_id, &markdown, &options))?;
    report(&outcome)
}

fn apply_command(
    document_id: &str,
    requests: &Path,
    service: &ServiceArgs,
    config: &Config,
) -> Result<()> {
    let content = read_input(Some(requests))?;
    let body: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse batch JSON from {}", requests.display()))?;

    let client = connect(service, config)?;
    let outcome = submitted(apply_batch(&client, document_id, &body))?;
    report(&outcome)
}

fn clear_command(
    document_id: &str,
    start: Option<usize>,
    end: Option<usize>,
    service: &ServiceArgs,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    let client = connect(service, config)?;

    if dry_run {
        let batch = clear_range(&client, document_id, start, end)?;
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    let outcome = submitted(clear_document(&client, document_id, start, end))?;
    report(&outcome)
}

/// Echoes a rejected request's response body to stderr before failing.
fn submitted(result: Result<SubmitOutcome, SubmitError>) -> Result<SubmitOutcome> {
    result.map_err(|err| {
        if let Some(body) = rejection_body(&err) {
            eprintln!("{}", body.trim_end());
        }
        err.into()
    })
}

fn rejection_body(err: &SubmitError) -> Option<&str> {
    match err {
        SubmitError::Service(service) => service.body(),
        _ => None,
    }
}

fn report(outcome: &SubmitOutcome) -> Result<()> {
    eprintln!("Sent {} request(s)", outcome.requests);
    println!("{}", serde_json::to_string_pretty(&outcome.reply)?);
    Ok(())
}

fn connect(service: &ServiceArgs, config: &Config) -> Result<DocsClient> {
    let token = access_token(service.access_token.as_deref(), config)?;
    let endpoint = service
        .endpoint
        .as_deref()
        .unwrap_or(config.service.endpoint.as_str());

    log::debug!("using document service at {endpoint}");
    let client = DocsClient::with_url(endpoint, token)?
        .with_timeout(Duration::from_secs(config.service.timeout_secs))?;
    Ok(client)
}

/// Token from the command line or environment, falling back to the configured token file.
fn access_token(flag: Option<&str>, config: &Config) -> Result<String> {
    if let Some(token) = flag.map(str::trim)
        && !token.is_empty()
    {
        return Ok(token.to_string());
    }
    match config.read_token()? {
        Some(token) => Ok(token),
        None => bail!(
            "No access token: pass --access-token, set MDBATCH_ACCESS_TOKEN or configure service.token_file"
        ),
    }
}

fn compile_options(config: &Config, initial_offset: Option<usize>) -> CompileOptions {
    let compile = &config.compile;
    CompileOptions {
        initial_offset: initial_offset.unwrap_or(compile.initial_offset),
        monospace_font: compile.monospace_font.clone(),
        ordered_preset: compile.ordered_preset.clone(),
        unordered_preset: compile.unordered_preset.clone(),
    }
}

fn load_markdown(source: &SourceArgs) -> Result<String> {
    let body = read_input(source.input.as_deref())?;
    let content_type = source.json.then_some(JSON_CONTENT_TYPE);
    Ok(extract_markdown(&body, content_type)?)
}

/// Reads a file, or stdin for `-` and no path.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
