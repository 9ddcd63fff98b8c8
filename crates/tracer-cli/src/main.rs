//! `tracewright`: traces a `stepscript` program and prints its state-diff
//! log as one JSON document on stdout.

use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tracer_cli::error::CliError;

#[derive(Parser)]
#[command(name = "tracewright", about = "Traces a stepscript program and emits its state-diff log as JSON")]
struct Cli {
    /// Name of a built-in demo module (fibonacci, mergesort, tree, dict-mutation, append-reset, infinite-loop)
    #[arg(long, conflicts_with = "file")]
    module: Option<String>,

    /// Path to a stepscript source file
    #[arg(long, conflicts_with = "module")]
    file: Option<String>,

    /// Wall-clock trace budget in milliseconds
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,

    /// Log level passed to the tracing subscriber (falls back to RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let timeout = Duration::from_millis(cli.timeout_ms);

    let doc = if let Some(module) = cli.module.as_deref() {
        match tracer_cli::run_module(module, timeout) {
            Ok(doc) => doc,
            Err(e) => error_envelope(e),
        }
    } else if let Some(path) = cli.file.as_deref() {
        match fs::read_to_string(path) {
            Ok(src) => tracer_cli::run_source(&src, timeout),
            Err(source) => error_envelope(CliError::Io { path: path.to_string(), source }),
        }
    } else {
        eprintln!("tracewright: one of --module or --file is required");
        return ExitCode::FAILURE;
    };

    match serde_json::to_writer(std::io::stdout(), &doc) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tracewright: failed to write JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

fn error_envelope(e: CliError) -> serde_json::Value {
    serde_json::json!({ "error": e.to_json(), "log": [], "infer": [] })
}
