use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Commands;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "deepculture")]
#[command(about = "Ask a question, get an answer and a paced series of analyses", long_about = None)]
struct Cli {
    /// Enable debug output for the deepculture crates
    #[arg(long = "debug", default_value_t = false, global = true)]
    debug: bool,

    /// Also write logs to this file
    #[arg(long = "log-file", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _log_guard = match init_tracing(cli.debug, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = cli.command.run().await {
        eprintln!("Ops! something went wrong: {}", e);
        std::process::exit(1);
    }
}

fn default_filter(debug: bool) -> String {
    if debug {
        "info,deepculture=debug,deepculture_ai=debug,deepculture_server=debug,deepculture_client=debug,tower_http=debug".to_string()
    } else {
        "info".to_string()
    }
}

fn init_tracing(debug: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, String> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(debug).into());

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (dir, file_name) = log_file_parts(path)?;
            std::fs::create_dir_all(&dir)
                .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok(guard)
}

fn log_file_parts(path: &Path) -> Result<(PathBuf, PathBuf), String> {
    let Some(file_name) = path.file_name() else {
        return Err(format!("Log file path has no file name: {}", path.display()));
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(file_name)))
}
