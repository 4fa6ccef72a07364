//! Mock ACP agent - scripted agent double for ACP client tests

use anyhow::{Context, Result};
use clap::Parser;
use mock_acp_agent::config::{Mode, ResponderConfig, DEFAULT_SESSION_ID};
use mock_acp_agent::responder::{log_summary, Responder};
use std::time::Duration;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mock-acp-agent")]
#[command(about = "Scripted ACP agent that answers JSON-RPC on stdin/stdout")]
#[command(version)]
struct Args {
    /// Prompt behavior: normal, slow or error. Unrecognized values act as normal.
    #[arg(long, env = "ACP_MOCK_MODE", default_value = "normal")]
    mode: String,

    /// How long slow mode stalls each prompt turn, in milliseconds.
    #[arg(long, env = "ACP_MOCK_SLOW_DELAY_MS", default_value_t = 5000)]
    slow_delay_ms: u64,

    /// Session id returned by session/new.
    #[arg(long, env = "ACP_MOCK_SESSION_ID", default_value = DEFAULT_SESSION_ID)]
    session_id: String,

    /// Enable debug logging on stderr
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug { "debug" } else { "info" };

    // stdout carries the protocol, so diagnostics go to stderr only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ResponderConfig {
        mode: Mode::from_config_value(&args.mode),
        slow_delay: Duration::from_millis(args.slow_delay_ms),
        session_id: args.session_id,
    };

    tracing::info!("started in {}", Mode::describe_config_value(&args.mode));

    let stdin = BufReader::new(tokio::io::stdin());
    let mut responder = Responder::new(config, stdin, tokio::io::stdout());

    match responder.run().await {
        Ok(summary) => {
            log_summary(&summary);
            Ok(())
        }
        Err(e) if e.is_broken_stream() => {
            tracing::debug!("client closed the stream: {e}");
            Ok(())
        }
        Err(e) => Err(e).context("mock agent loop failed"),
    }
}
