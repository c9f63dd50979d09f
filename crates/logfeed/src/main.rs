mod error;
mod feed;
mod logger;
mod paths;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use crate::feed::FeedMode;

/// Pause between status lines in the run log.
const RUN_INTERVAL: Duration = Duration::from_secs(10);

/// Append timestamped status lines to per-run log files until interrupted.
#[derive(Parser)]
#[command(name = "logfeed", version)]
struct Cli {
    /// Existing directory the start/run/stop logs are written into
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // try_parse instead of parse: argument errors exit with code 1, and no
    // log file is touched before the argument count is known good.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                // --help / --version
                ExitCode::SUCCESS
            };
        }
    };

    let (mode_tx, mode_rx) = watch::channel(FeedMode::Running);
    spawn_signal_watcher(mode_tx);

    match feed::run(&cli.output_dir, RUN_INTERVAL, mode_rx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Flip the mode to `Draining` on the first SIGINT or SIGTERM. The feed
/// observes the change at its next suspension point and runs its cleanup
/// writes before the process exits.
fn spawn_signal_watcher(mode_tx: watch::Sender<FeedMode>) {
    tokio::spawn(async move {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).ok();
        let mut sigint = signal(SignalKind::interrupt()).ok();

        tokio::select! {
            _ = recv_signal(&mut sigterm) => {
                info!("received SIGTERM, draining");
            }
            _ = recv_signal(&mut sigint) => {
                info!("received SIGINT, draining");
            }
        }
        let _ = mode_tx.send(FeedMode::Draining);
    });
}

/// Await a signal if registered, or pend forever if registration failed.
async fn recv_signal(sig: &mut Option<tokio::signal::unix::Signal>) {
    match sig {
        Some(s) => {
            s.recv().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_directory_argument_parses() {
        let cli = Cli::try_parse_from(["logfeed", "/tmp/x"]).unwrap();
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn zero_arguments_is_a_usage_error() {
        assert!(Cli::try_parse_from(["logfeed"]).is_err());
    }

    #[test]
    fn extra_arguments_are_a_usage_error() {
        assert!(Cli::try_parse_from(["logfeed", "/tmp/x", "/tmp/y"]).is_err());
    }
}
