use chrono::Local;
use tokio::io::AsyncWriteExt;

use crate::error::{FeedError, FeedResult};
use crate::paths::{FeedPaths, LogTarget};

/// Appends timestamped lines to the three feed files.
///
/// Every call opens the target in append mode, writes one line, flushes,
/// and closes it. No handle outlives the call, so a failed write never
/// leaks one and nothing is held across the run loop's sleep.
pub struct FeedLogger {
    paths: FeedPaths,
}

impl FeedLogger {
    pub fn new(paths: FeedPaths) -> Self {
        Self { paths }
    }

    /// Append `"<YYYY-MM-DD HH:MM:SS>: <message>"` plus a newline to the
    /// target file, flushed before returning so each line is visible on
    /// disk before the next one is produced.
    ///
    /// The line is echoed to stdout first, matching the original feed's
    /// console duplication. Echo happens even when the file write fails.
    pub async fn write_line(&self, target: LogTarget, message: &str) -> FeedResult<()> {
        let line = format!("{}: {message}\n", Local::now().format("%Y-%m-%d %H:%M:%S"));
        print!("{line}");

        let path = self.paths.target(target);
        self.append(path, line.as_bytes())
            .await
            .map_err(|source| FeedError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn append(&self, path: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }
}
