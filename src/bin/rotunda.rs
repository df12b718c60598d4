//! CLI binary for rotunda.
//!
//! `rotunda serve` (the default) runs the web service; `rotunda draft`
//! runs the same pipeline on two local PDFs and prints the result.

use anyhow::{Context, Result};
use clap::{Args, FromArgMatches, Parser, Subcommand};
use rotunda::config::{DEFAULT_MODEL, DEFAULT_PROVIDER, MAX_EXCERPT_CHARS};
use rotunda::pipeline::render::draft_html;
use rotunda::{
    serve, AppState, DraftConfig, DraftPipeline, LlmDraftModel, PdfiumExtractor, ServerConfig,
    UploadPair,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Start the web service on 0.0.0.0:8080
  rotunda

  # Bind elsewhere
  rotunda serve --host 127.0.0.1 --port 3000

  # Draft from local files, print plain text
  rotunda draft district.pdf grant.pdf

  # Write the HTML fragment the web service would return
  rotunda draft district.pdf grant.pdf -o draft.html

  # Structured output with token usage
  rotunda draft district.pdf grant.pdf --json

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY     OpenAI API key (OPEN_API_KEY is accepted as a fallback)
  ROTUNDA_PROVIDER   LLM provider (openai, anthropic, gemini, ollama, …)
  ROTUNDA_MODEL      Model ID
  ROTUNDA_HOST       Bind host for `serve`
  ROTUNDA_PORT       Bind port for `serve`
  PDFIUM_LIB_PATH    Path to libpdfium; otherwise the system library is used
  RUST_LOG           Tracing filter, overrides --verbose/--quiet

A .env file in the working directory is loaded at startup."#;

#[derive(Parser, Debug)]
#[command(
    name = "rotunda",
    version,
    about = "Draft grant applications from district and grant PDFs",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// LLM model ID.
    #[arg(long, global = true, env = "ROTUNDA_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, global = true, env = "ROTUNDA_PROVIDER", default_value = DEFAULT_PROVIDER)]
    provider: String,

    /// Path to a text file containing a custom system message.
    #[arg(long, global = true, env = "ROTUNDA_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// LLM temperature (0.0–2.0). Provider default when unset.
    #[arg(long, global = true, env = "ROTUNDA_TEMPERATURE")]
    temperature: Option<f32>,

    /// Max LLM output tokens. Provider default when unset.
    #[arg(long, global = true, env = "ROTUNDA_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Characters kept from each document.
    #[arg(long, global = true, env = "ROTUNDA_EXCERPT_CHARS", default_value_t = MAX_EXCERPT_CHARS)]
    excerpt_chars: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "ROTUNDA_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "ROTUNDA_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web service (default).
    Serve(ServeArgs),
    /// Generate one draft from local files.
    Draft(DraftArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Bind host.
    #[arg(long, env = "ROTUNDA_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Bind port.
    #[arg(long, env = "ROTUNDA_PORT", default_value_t = 8080)]
    port: u16,
}

#[derive(Args, Debug)]
struct DraftArgs {
    /// District document (PDF).
    district: PathBuf,

    /// Grant document (PDF).
    grant: PathBuf,

    /// Write the draft to this file; `.html` files get the HTML fragment.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print structured JSON (draft + token usage) instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Environment is modified before the runtime spawns any threads.
    let dotenv = dotenvy::dotenv();
    if std::env::var_os("OPENAI_API_KEY").is_none() {
        if let Some(legacy) = std::env::var_os("OPEN_API_KEY") {
            std::env::set_var("OPENAI_API_KEY", legacy);
        }
    }

    let mut cli = Cli::parse();
    let command = match cli.command.take() {
        Some(command) => command,
        None => Command::Serve(ServeArgs::from_env().unwrap_or_else(|e| e.exit())),
    };

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    tokio::runtime::Runtime::new()
        .context("Failed to create tokio runtime")?
        .block_on(run(cli, command))
}

async fn run(cli: Cli, command: Command) -> Result<()> {
    let config = build_config(&cli).await?;

    match command {
        Command::Draft(ref args) => run_draft(args, config, cli.quiet).await,
        Command::Serve(ref args) => run_serve(args, config).await,
    }
}

impl ServeArgs {
    /// Arguments for a bare `rotunda` invocation.
    ///
    /// Runs the `serve` arguments through clap with an empty command line,
    /// so `ROTUNDA_HOST`/`ROTUNDA_PORT` are validated exactly as they are
    /// for `rotunda serve`.
    fn from_env() -> Result<Self, clap::Error> {
        let cmd = Self::augment_args(clap::Command::new("rotunda"));
        let matches = cmd.try_get_matches_from(["rotunda"])?;
        Self::from_arg_matches(&matches)
    }
}

async fn run_serve(args: &ServeArgs, config: DraftConfig) -> Result<()> {
    let model = LlmDraftModel::from_config(&config);
    if !model.is_configured() {
        warn!(
            "LLM provider '{}' is not configured; uploads will fail until it is",
            config.provider_name
        );
    }
    let pipeline = DraftPipeline::with_parts(config, Arc::new(PdfiumExtractor), Arc::new(model));

    let server = ServerConfig {
        host: args.host.clone(),
        port: args.port,
    };

    serve(&server, AppState::new(pipeline), shutdown_signal())
        .await
        .context("Server failed")
}

async fn run_draft(args: &DraftArgs, config: DraftConfig, quiet: bool) -> Result<()> {
    let upload = UploadPair::from_paths(&args.district, &args.grant)
        .await
        .context("Failed to read input documents")?;
    let output = DraftPipeline::new(config)
        .generate_draft(upload)
        .await
        .context("Draft generation failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if let Some(ref path) = args.output {
        let is_html = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
        let body = if is_html {
            draft_html(&output.draft)?
        } else {
            output.draft.clone()
        };
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !quiet {
            eprintln!("✔ Draft written to {}", path.display());
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.draft.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.draft.ends_with('\n') {
            handle
                .write_all(b"\n")
                .context("Failed to write to stdout")?;
        }
    }

    if !quiet && !args.json {
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms total",
            output.prompt_tokens,
            output.completion_tokens,
            output.extract_duration_ms + output.llm_duration_ms,
        );
    }

    Ok(())
}

/// Map CLI args to `DraftConfig`.
async fn build_config(cli: &Cli) -> Result<DraftConfig> {
    let mut builder = DraftConfig::builder()
        .provider_name(&cli.provider)
        .model(&cli.model)
        .max_excerpt_chars(cli.excerpt_chars);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt.trim());
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }

    builder.build().context("Invalid configuration")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
