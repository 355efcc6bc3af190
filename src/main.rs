//! CLI entry point for the discorder tool.

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use clap::Parser;
use discorder_core::{ApiError, ClientConfig, DiscordClient, TOKEN_ENV_VAR};
use tokio::sync::Notify;
use tracing::{debug, warn};

mod cli;
mod commands;
mod output;

use cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    init_tracing(&args);
    debug!(?args, "CLI arguments parsed");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// Priority: `RUST_LOG` > quiet flag > verbose flag > default (info).
fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            warn!(%error, "ignoring unreadable .env file");
        }
    }

    let env_token = std::env::var(TOKEN_ENV_VAR).ok();
    let invocation = cli::resolve_invocation(env_token.as_deref(), &args.words)?;

    let log_requests = args.debug || (io::stdout().is_terminal() && !args.quiet);
    let config = ClientConfig::default().with_request_logging(log_requests);
    let client = DiscordClient::new(&invocation.credential, config)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupt_notify = Arc::new(Notify::new());
    let interrupted_signal = Arc::clone(&interrupted);
    let interrupt_signal_notify = Arc::clone(&interrupt_notify);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupted_signal.store(true, Ordering::SeqCst);
            interrupt_signal_notify.notify_one();
        }
    });

    let rendered = until_interrupted(
        commands::run(&client, &invocation.action, &interrupted),
        &interrupt_notify,
    )
    .await?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Runs `command` until it finishes or `interrupt` is notified; an interrupt
/// drops the command and any request it has in flight.
async fn until_interrupted<F>(command: F, interrupt: &Notify) -> Result<String>
where
    F: Future<Output = Result<String>>,
{
    tokio::select! {
        result = command => result,
        () = interrupt.notified() => Err(ApiError::Interrupted.into()),
    }
}
