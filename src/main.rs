use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use adl_chat::backend::{AdlClient, ChatBackend};
use adl_chat::core::config::{self, CliOverrides};
use adl_chat::core::conversation::{TurnOutcome, send_message};
use adl_chat::core::session::Session;
use adl_chat::plain::PlainRenderer;
use adl_chat::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "adl-chat", about = "Terminal client for the Adl Legal Service")]
struct Args {
    /// Base URL of the chat service (overrides ADL_BASE_URL and the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Ask a single question, stream the answer to stdout and exit
    #[arg(short, long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<ExitCode> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to adl-chat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("adl-chat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url.as_deref(),
        },
    );

    let client = match AdlClient::new(
        &resolved.base_url,
        resolved.service_key.clone(),
        resolved.connect_timeout,
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    log::info!("Adl chat starting up against {}", client.endpoint());

    match args.query {
        Some(query) => Ok(ask_once(&resolved, &client, &query).await),
        None => {
            tui::run(&resolved, Arc::new(client))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// One-shot mode: stream a single answer to stdout.
async fn ask_once(config: &config::ResolvedConfig, backend: &dyn ChatBackend, query: &str) -> ExitCode {
    let mut session = Session::new(config.history_limit, config.platform.as_str());
    let mut renderer = PlainRenderer::stdio();

    let outcome = send_message(&mut session, backend, query, &mut renderer).await;
    renderer.finish();

    match outcome {
        Ok(TurnOutcome::Completed) => ExitCode::SUCCESS,
        Ok(TurnOutcome::Failed(e)) => {
            log::warn!("One-shot query failed: {}", e);
            ExitCode::FAILURE
        }
        Err(rejected) => {
            eprintln!("Nothing to send: {rejected}");
            ExitCode::FAILURE
        }
    }
}
