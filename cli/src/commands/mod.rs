use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod ask;
pub mod serve;

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server hosting the page and the dispatcher endpoint
    Serve(ServeArgs),

    /// Ask a question against a running server and follow its analyses
    Ask(AskArgs),
}

#[derive(Args, Debug, PartialEq)]
pub struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:8080
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Path to the config file (defaults to ~/.deepculture/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Chat-completion endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Upstream API key (overrides the config file and MISTRAL_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Upstream model name
    #[arg(long)]
    pub model: Option<String>,

    /// Completion length limit sent upstream
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Directory receiving the session log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Args, Debug, PartialEq)]
pub struct AskArgs {
    /// Question to send as the initial question
    pub question: String,

    /// Base URL of a running deepculture server
    #[arg(long, env("DEEPCULTURE_URL"), default_value = "http://127.0.0.1:8080")]
    pub url: String,

    /// Pause before each analysis request, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 3000)]
    pub delay_ms: u64,
}

impl Commands {
    pub async fn run(self) -> Result<(), String> {
        match self {
            Commands::Serve(args) => serve::run(args).await,
            Commands::Ask(args) => ask::run(args).await,
        }
    }
}
