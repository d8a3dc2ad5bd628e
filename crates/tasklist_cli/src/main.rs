use clap::Parser;
use std::io;
use tasklist_cli::cli::{Cli, collect_overrides};
use tasklist_cli::session::{self, Output, is_informational, normalize_parse_error};
use tasklist_core::config::{load_config_with_fallback, merge_overrides, palette_for_theme};
use tasklist_core::controller::TaskListController;
use tasklist_core::error::AppError;
use tasklist_core::service::HttpTaskService;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing() {
    // Opt-in via RUST_LOG; stderr keeps stdout clean for --json.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: using default config: {}", err);
    }

    let overrides = collect_overrides(&cli.config_override, cli.api_url.as_deref())?;
    let config = merge_overrides(&loaded.config, &overrides);
    tracing::debug!(api_base_url = config.api_base_url(), "resolved config");

    let service = HttpTaskService::with_timeout(config.api_base_url(), config.request_timeout());
    let controller = TaskListController::new(service);
    let output = Output::new(palette_for_theme(config.theme.as_deref()), cli.json);

    match cli.command {
        Some(command) => session::run_once(controller, command, &output),
        None => session::run_interactive(controller, io::stdin().lock(), &output),
    }
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
