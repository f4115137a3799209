use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::exchange::ExchangeRequest;
use crate::logging::{init_logging_with_config, LogConfig};
use crate::registry::TypeRegistry;
use crate::runtime_config::RuntimeConfig;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line front end for a resource registry.
///
/// Builds a request from the arguments, dispatches it in-process and prints
/// the handler result as JSON.
#[derive(Parser, Debug)]
#[command(name = "cakerouter")]
#[command(about = "Convention-based request dispatcher", long_about = None)]
pub struct Cli {
    /// YAML runtime configuration; environment variables override it
    #[arg(long, global = true, env = "CAKE_CONFIG")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch one request and print the result
    Dispatch {
        /// HTTP verb
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Context prefix to strip from the path (overrides configuration)
        #[arg(short, long)]
        prefix: Option<String>,

        /// Inline JSON body
        #[arg(short, long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the JSON body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,

        /// Request target: path with optional query string, e.g. `/com/bank/customer/1?name=Ann`
        target: String,
    },
    /// List registered resource types and their verb-methods
    Types,
}

fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.trim().to_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{method}'"))
}

fn error_report(err: &DispatchError) -> serde_json::Value {
    json!({
        "error": err.class().to_string(),
        "message": err.to_string(),
    })
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    match &cli.config {
        Some(path) => RuntimeConfig::from_yaml_file(path),
        None => Ok(RuntimeConfig::from_env()),
    }
}

/// Run a parsed command against `registry`, writing JSON to `out`.
///
/// Returns `Ok(false)` when the dispatch itself failed; the failure report has
/// already been written to `out` in that case.
///
/// # Errors
///
/// Fails on bad arguments, unreadable configuration or body files, and output errors.
pub fn run_cli(cli: &Cli, registry: TypeRegistry, out: &mut impl Write) -> Result<bool> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Dispatch {
            method,
            prefix,
            body,
            body_file,
            target,
        } => {
            if target.trim().is_empty() {
                bail!("Request target must not be empty");
            }
            let method = parse_method(method)?;
            let prefix = prefix.clone().unwrap_or_else(|| config.context_prefix.clone());
            let body = match (body, body_file) {
                (Some(inline), _) => inline.clone(),
                (None, Some(path)) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read body file {}", path.display()))?,
                (None, None) => String::new(),
            };

            let request = ExchangeRequest::from_target(method, target, &prefix).with_body(body);
            let dispatcher = Dispatcher::with_config(registry, config);

            match dispatcher.dispatch(&request) {
                Ok(value) => {
                    serde_json::to_writer_pretty(&mut *out, &value.to_json())?;
                    writeln!(out)?;
                    Ok(true)
                }
                Err(err) => {
                    serde_json::to_writer_pretty(&mut *out, &error_report(&err))?;
                    writeln!(out)?;
                    Ok(false)
                }
            }
        }
        Commands::Types => {
            for resource in registry.iter() {
                writeln!(out, "{}", resource.name())?;
                for method in resource.methods() {
                    writeln!(out, "    {}", method.signature())?;
                }
                if !resource.bindings().is_empty() {
                    let members: Vec<&str> =
                        resource.bindings().members().iter().map(|m| m.name()).collect();
                    writeln!(out, "    members: {}", members.join(", "))?;
                }
                if let Some(body) = resource.body() {
                    writeln!(out, "    body: {}", body.type_name())?;
                }
            }
            Ok(true)
        }
    }
}

/// Map the outcome of [`run_cli`] to the process exit status.
pub(crate) fn exit_status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Parse the process arguments, install logging, and run.
///
/// Returns [`ExitCode::FAILURE`] when the dispatch fails. The logging guard is
/// dropped before the caller exits, so buffered log lines are flushed.
///
/// # Errors
///
/// See [`run_cli`].
pub fn run(registry: TypeRegistry) -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logging_with_config(&LogConfig::from_env())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let ok = run_cli(&cli, registry, &mut out)?;
    out.flush()?;
    Ok(exit_status(ok))
}
