//! Batch client for the registry order interface.
//!
//! Reads orders from a batch file, sends them one by one over a TLS
//! connection, and writes the answers to an answers file.
//!
//! Exit status:
//! - 0   : every order answered
//! - 1   : setup failed (config, files, connect)
//! - 2   : batch aborted at some order (see log for position)
//! - 130 : interrupted

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rri_client::config::{millis, Config};
use rri_client::connection::{close, connect_tls};
use rri_client::{AnswerWriter, Exchange, ExchangeError, ExchangeSummary};
use rri_protocol::split_orders;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "rri-client")]
#[clap(about = "Send a batch of registry orders and collect the answers")]
struct Cli {
    /// Batch file with orders separated by `=-=` lines
    #[clap(short, long, default_value = "orders.rri")]
    orders: PathBuf,

    /// Where to write the answers
    #[clap(short, long, default_value = "answers.rri")]
    answers: PathBuf,

    /// Registry host (overrides RRI_HOST)
    #[clap(long)]
    host: Option<String>,

    /// Registry port (overrides RRI_PORT)
    #[clap(short, long)]
    port: Option<u16>,

    /// Per-answer deadline in milliseconds, 0 waits forever (overrides RRI_READ_TIMEOUT_MS)
    #[clap(long)]
    read_timeout_ms: Option<u64>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

enum Outcome {
    Completed(ExchangeSummary),
    Aborted(ExchangeError),
    Interrupted,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli).await {
        Ok(Outcome::Completed(summary)) => {
            info!(
                "Batch complete: {} orders answered ({} bytes out, {} bytes in)",
                summary.answers_delivered, summary.bytes_sent, summary.bytes_received
            );
            ExitCode::SUCCESS
        }
        Ok(Outcome::Aborted(err)) => {
            if err.transport().is_some_and(|t| t.is_peer_closed()) {
                warn!("Registry closed the connection");
            }
            let (position, delivered) = (err.position(), err.delivered());
            error!(
                "Batch aborted at order {} ({} answers written): {:#}",
                position,
                delivered,
                anyhow::Error::new(err)
            );
            ExitCode::from(2)
        }
        Ok(Outcome::Interrupted) => ExitCode::from(130),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let mut config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(ms) = cli.read_timeout_ms {
        config.read_timeout = millis(ms);
    }

    let raw = tokio::fs::read(&cli.orders)
        .await
        .with_context(|| format!("unable to open orders file {}", cli.orders.display()))?;
    let orders = split_orders(raw);
    info!("Loaded {} orders from {}", orders.len(), cli.orders.display());

    let answers = tokio::fs::File::create(&cli.answers)
        .await
        .with_context(|| format!("unable to open answers file {}", cli.answers.display()))?;
    let mut sink = AnswerWriter::new(answers);

    let mut stream = connect_tls(&config).await?;

    let exchange = Exchange::new(&mut stream, config.exchange_options());
    let outcome = tokio::select! {
        res = exchange.run(&orders, &mut sink) => match res {
            Ok(summary) => Outcome::Completed(summary),
            Err(e) => Outcome::Aborted(e),
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, remaining orders not sent");
            Outcome::Interrupted
        }
    };

    close(&mut stream).await;
    Ok(outcome)
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
