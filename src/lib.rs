pub mod commands;
pub mod config;
pub mod http_client;
pub mod shell;
pub mod summarizer;

use clap::Parser;
use commands::SummarizerState;
use config::{CliArgs, SummarizerConfig};
use std::sync::Arc;
use summarizer::{HttpTransport, SummarizerSession, SystemClipboard};
use tracing_subscriber::EnvFilter;

pub fn run() {
    // Load .env file - current dir first, then the parent
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }

    // Default: warn for most crates, info for ours
    // Use RUST_LOG=debug for per-request logs
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,paper_summarizer_lib=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = CliArgs::parse();
    let config = SummarizerConfig::from_env().with_cli(&cli);
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(2);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        endpoint = %config.endpoint,
        output_dir = %config.output_dir.display(),
        "[Summarizer] Starting session"
    );

    let session = SummarizerSession::new(
        config.session_options(),
        Arc::new(HttpTransport::new(config.endpoint.clone())),
        Arc::new(SystemClipboard::default()),
    );
    let state = SummarizerState::new(session);

    runtime.block_on(async move {
        if !cli.files.is_empty() {
            if let Err(e) = commands::summarizer_select_files(cli.files.clone(), &state).await {
                eprintln!("{}", e);
            }
        }

        if let Err(e) = shell::run_shell(state).await {
            tracing::error!("Shell stopped: {}", e);
        }
    });
}
