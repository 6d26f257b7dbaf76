use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use category_console::api::{ArgValue, HttpTransport, Transport};
use category_console::config::ConsoleConfig;
use category_console::console::{ConsoleController, OperationKey, OperationKind};
use category_console::output::PlainRenderer;
use category_console::tui::{run_tui, TuiApp};

#[derive(Parser)]
#[command(
    name = "category-console",
    about = "Console for exercising a category tree API."
)]
struct Cli {
    /// API base URL (overrides config and CATEGORY_CONSOLE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Load this config file instead of the user/project pair
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs here in TUI mode (otherwise they are discarded)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive console (default)
    Tui,
    /// Run one operation starting from the catalog defaults
    Call {
        /// Operation name, e.g. getPath
        operation: String,
        /// Field override, name=value
        #[arg(long = "arg", value_parser = parse_arg)]
        args: Vec<(String, String)>,
        /// Checkbox to tick
        #[arg(long = "flag")]
        flags: Vec<String>,
    },
    /// List the operation catalog
    Ops,
}

fn parse_arg(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{s}`"))?;
    Ok((name.to_string(), value.to_string()))
}

fn env_filter() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env().add_directive("category_console=info".parse()?))
}

fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter()?)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter()?)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);

    match (&command, &cli.log_file) {
        (Command::Tui, Some(path)) => init_file_logging(path)?,
        (Command::Tui, None) => {}
        _ => init_stderr_logging()?,
    }

    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::load_file(path)?,
        None => ConsoleConfig::load(),
    };
    if let Some(url) = cli.base_url {
        config.set_base_url(url);
    }

    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::with_timeout(config.base_url.clone(), config.timeout())?);
    let mut controller =
        ConsoleController::with_catalog(transport).context("registering operation catalog")?;

    match command {
        Command::Tui => {
            controller.select_operation(config.initial_operation()?)?;
            info!(base_url = %config.base_url, "category console starting");
            run_tui(TuiApp::new(controller, &config)).await
        }
        Command::Call {
            operation,
            args,
            flags,
        } => {
            let key: OperationKey = operation.parse()?;
            for (name, value) in args {
                controller.set_field(key, &name, ArgValue::Text(value))?;
            }
            for name in flags {
                controller.set_field(key, &name, ArgValue::Flag(true))?;
            }
            controller.select_operation(key)?;

            let mut renderer = PlainRenderer::new();
            let outcome = controller.submit(&mut renderer).await;
            // A modify can succeed and its tree refresh fail afterwards.
            print!("{}", renderer.finish());
            outcome.with_context(|| format!("{key} against {}", config.base_url))
        }
        Command::Ops => {
            for entry in controller.registry().entries() {
                let def = &entry.definition;
                let kind = match def.kind {
                    OperationKind::Modify => "modify",
                    OperationKind::QueryValue => "value",
                    OperationKind::QueryList => "list",
                };
                let fields: Vec<String> = entry
                    .form
                    .fields
                    .iter()
                    .map(|f| format!("{}={}", f.spec.name, f.display()))
                    .collect();
                println!(
                    "{:<12} {:<10} {:<6} {}",
                    def.key.as_str(),
                    def.display_name,
                    kind,
                    fields.join(" ")
                );
            }
            Ok(())
        }
    }
}
