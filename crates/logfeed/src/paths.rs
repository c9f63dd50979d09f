use std::path::{Path, PathBuf};

/// Which of the three feed files a line is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Start,
    Run,
    Stop,
}

/// The three log paths, derived once from the output directory plus the
/// pid and epoch seconds captured at startup, and never recomputed.
///
/// `start.log` and `stop.log` are shared across runs; the run log embeds
/// the epoch and pid so concurrent invocations never collide on it.
#[derive(Debug, Clone)]
pub struct FeedPaths {
    start: PathBuf,
    run: PathBuf,
    stop: PathBuf,
}

impl FeedPaths {
    pub fn new(output_dir: &Path, pid: u32, epoch_secs: i64) -> Self {
        Self {
            start: output_dir.join("start.log"),
            run: output_dir.join(format!("{epoch_secs}_{pid}_run.log")),
            stop: output_dir.join("stop.log"),
        }
    }

    pub fn target(&self, target: LogTarget) -> &Path {
        match target {
            LogTarget::Start => &self.start,
            LogTarget::Run => &self.run,
            LogTarget::Stop => &self.stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_log_embeds_epoch_and_pid() {
        let paths = FeedPaths::new(Path::new("/tmp/x"), 100, 1_700_000_000);
        assert_eq!(
            paths.target(LogTarget::Run),
            Path::new("/tmp/x/1700000000_100_run.log")
        );
    }

    #[test]
    fn marker_logs_use_fixed_names() {
        let paths = FeedPaths::new(Path::new("/var/feed"), 42, 1_700_000_000);
        assert_eq!(paths.target(LogTarget::Start), Path::new("/var/feed/start.log"));
        assert_eq!(paths.target(LogTarget::Stop), Path::new("/var/feed/stop.log"));
    }

    #[test]
    fn run_log_differs_when_pid_or_epoch_differs() {
        let dir = Path::new("/tmp/x");
        let a = FeedPaths::new(dir, 100, 1_700_000_000);
        let b = FeedPaths::new(dir, 101, 1_700_000_000);
        let c = FeedPaths::new(dir, 100, 1_700_000_001);
        assert_ne!(a.target(LogTarget::Run), b.target(LogTarget::Run));
        assert_ne!(a.target(LogTarget::Run), c.target(LogTarget::Run));
    }
}
