use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{FeedError, FeedResult};
use crate::logger::FeedLogger;
use crate::paths::{FeedPaths, LogTarget};

/// Feed lifecycle mode, broadcast on a watch channel by the signal watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    Running,
    Draining,
}

/// The status feed: one-shot start/stop markers plus the periodic run loop.
pub struct Feed {
    logger: FeedLogger,
    pid: u32,
    interval: Duration,
}

impl Feed {
    pub fn new(logger: FeedLogger, pid: u32, interval: Duration) -> Self {
        Self {
            logger,
            pid,
            interval,
        }
    }

    /// Start marker, written exactly once before the run loop.
    pub async fn start_marker(&self) -> FeedResult<()> {
        self.logger
            .write_line(LogTarget::Start, &format!("{}: Program started", self.pid))
            .await
    }

    /// Periodic status lines until the mode flips to `Draining`.
    ///
    /// The "End logging" line is the release paired with the "Start logging"
    /// acquisition: it is attempted no matter how the body ended, including
    /// a failed entry write. When the body and the end write both fail, the
    /// body error wins.
    pub async fn run_loop(&self, mut mode_rx: watch::Receiver<FeedMode>) -> FeedResult<()> {
        let body = async {
            self.logger
                .write_line(LogTarget::Run, &format!("Start logging: {}", self.pid))
                .await?;
            self.run_body(&mut mode_rx).await
        }
        .await;

        let end = self
            .logger
            .write_line(LogTarget::Run, &format!("End logging: {}", self.pid))
            .await;
        if body.is_err() && end.is_err() {
            warn!("end-of-run line lost as well");
        }
        body.and(end)
    }

    async fn run_body(&self, mode_rx: &mut watch::Receiver<FeedMode>) -> FeedResult<()> {
        let mut n: u64 = 1;
        loop {
            if *mode_rx.borrow_and_update() == FeedMode::Draining {
                return Ok(());
            }
            self.logger
                .write_line(LogTarget::Run, &format!("INFO: Running log message {n}"))
                .await?;
            debug!(n, "status line written");
            n += 1;

            // Interruptible wait: a mode change wakes the loop immediately
            // instead of after the full interval.
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = mode_rx.changed() => {}
            }
        }
    }

    /// Stop marker, the outermost cleanup at process scope, paired with
    /// `start_marker`.
    pub async fn stop_marker(&self) -> FeedResult<()> {
        self.logger
            .write_line(
                LogTarget::Stop,
                &format!("End logging {}: Program stopped", self.pid),
            )
            .await
    }
}

/// Drive the full lifecycle against `output_dir`: validate the directory,
/// capture pid and epoch once, then start marker → run loop → stop marker.
///
/// The stop marker is written no matter how the loop ended; its failure is
/// only reported when everything before it succeeded.
pub async fn run(
    output_dir: &Path,
    interval: Duration,
    mode_rx: watch::Receiver<FeedMode>,
) -> FeedResult<()> {
    let meta = tokio::fs::metadata(output_dir).await.map_err(|e| {
        FeedError::Config(format!("output directory {}: {e}", output_dir.display()))
    })?;
    if !meta.is_dir() {
        return Err(FeedError::Config(format!(
            "output path {} is not a directory",
            output_dir.display()
        )));
    }

    let pid = std::process::id();
    let epoch = Utc::now().timestamp();
    let paths = FeedPaths::new(output_dir, pid, epoch);
    let feed = Feed::new(FeedLogger::new(paths), pid, interval);

    info!(pid, dir = %output_dir.display(), "feed started");

    let result = async {
        feed.start_marker().await?;
        feed.run_loop(mode_rx).await
    }
    .await;

    let stop = feed.stop_marker().await;
    info!(pid, "feed stopped");
    result.and(stop)
}
