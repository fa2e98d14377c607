use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sensu_teams_handler::{Args, Event, HandlerConfig, HandlerError, TeamsHandler};

fn init_logging(log_dir: Option<&Path>) {
    // Optional JSON file log with daily rotation.
    let file_layer = log_dir.map(|dir| {
        fmt::layer()
            .with_writer(rolling::daily(dir, "sensu-teams-handler.log"))
            .with_ansi(false)
            .json()
    });

    // stdout is owned by the Sensu pipeline, so humans read stderr.
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

async fn run(args: &Args) -> Result<(), HandlerError> {
    let handler = TeamsHandler::new(HandlerConfig::from(args))?;

    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .map_err(|e| HandlerError::Event(e.into()))?;
    let event = Event::from_json(&raw)?;

    handler.handle(&event).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();
    let args = Args::parse();

    init_logging(args.log_dir.as_deref());
    info!(version = env!("CARGO_PKG_VERSION"), "Starting sensu-teams-handler.");

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Handler failed.");
            ExitCode::FAILURE
        }
    }
}
