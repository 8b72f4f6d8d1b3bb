//! Periodic curation.
//!
//! Each cycle runs the curator as a child process so no in-process state
//! survives between runs; only the artifact on disk carries over. The child's
//! output is captured and relayed through the scheduler's log.

use std::future::Future;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{info, warn, Level};

/// Outcome of a scheduler session
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScheduleSummary {
    /// Cycles started
    pub cycles: u64,
    /// Cycles whose child exited unsuccessfully
    pub failures: u64,
}

/// Runs a command on a fixed interval
pub struct Scheduler {
    program: PathBuf,
    args: Vec<String>,
    interval: Duration,
    max_cycles: Option<u64>,
}

impl Scheduler {
    /// Schedule `program args...` every `interval`
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, interval: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            interval,
            max_cycles: None,
        }
    }

    /// Schedule this executable's `curate` command
    pub fn for_current_exe(curate_args: Vec<String>, interval: Duration) -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to locate the anima executable")?;
        let mut args = vec!["curate".to_string()];
        args.extend(curate_args);
        Ok(Self::new(exe, args, interval))
    }

    /// Stop after a number of cycles
    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Run until Ctrl-C
    pub async fn run(&self) -> Result<ScheduleSummary> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` resolves or the cycle limit is reached
    pub async fn run_until<F>(&self, shutdown: F) -> Result<ScheduleSummary>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Scheduler active: curating every {}s (Ctrl-C to stop)",
            self.interval.as_secs()
        );
        tokio::pin!(shutdown);

        let mut summary = ScheduleSummary::default();
        loop {
            if self.max_cycles.is_some_and(|max| summary.cycles >= max) {
                info!("Reached {} cycle(s), stopping", summary.cycles);
                break;
            }

            summary.cycles += 1;
            info!("CYCLE #{}: scanning global news", summary.cycles);

            tokio::select! {
                result = self.run_cycle() => {
                    match result {
                        Ok(true) => {}
                        Ok(false) => summary.failures += 1,
                        Err(e) => {
                            warn!("Cycle #{} could not run: {:#}", summary.cycles, e);
                            summary.failures += 1;
                        }
                    }
                }
                _ = &mut shutdown => {
                    // the child is not killed, it completes or abandons its own write
                    info!("Interrupted during cycle #{}, scheduler stopped", summary.cycles);
                    return Ok(summary);
                }
            }

            if self.max_cycles.is_some_and(|max| summary.cycles >= max) {
                continue;
            }

            info!("Sleeping: next update in {}s", self.interval.as_secs());
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!("Scheduler stopped");
                    break;
                }
            }
        }

        Ok(summary)
    }

    /// Run the command once, relaying its output; `Ok(false)` on a failed exit
    async fn run_cycle(&self) -> Result<bool> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to spawn {}", self.program.display()))?;

        for (level, line) in relayed_lines(&output) {
            if level == Level::WARN {
                warn!("    | {}", line);
            } else {
                info!("    | {}", line);
            }
        }

        if !output.status.success() {
            warn!(
                "Cycle exited with code {}",
                output.status.code().map_or("signal".to_string(), |c| c.to_string())
            );
            return Ok(false);
        }
        Ok(true)
    }
}

/// Lines of a child's output with the level they are logged at
///
/// Stderr only counts as a warning when the cycle failed.
fn relayed_lines(output: &Output) -> Vec<(Level, String)> {
    let stderr_level = if output.status.success() {
        Level::INFO
    } else {
        Level::WARN
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    stdout
        .lines()
        .map(|line| (Level::INFO, line.to_string()))
        .chain(stderr.lines().map(|line| (stderr_level, line.to_string())))
        .collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Scheduler {
        Scheduler::new("sh", vec!["-c".to_string(), script.to_string()], Duration::ZERO)
    }

    fn output(code: i32, stdout: &str, stderr: &str) -> Output {
        use std::os::unix::process::ExitStatusExt;
        Output {
            status: std::process::ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_healthy_cycle_relays_everything_as_info() {
        let lines = relayed_lines(&output(0, "Mood: Conflict\n", "INFO curated\n"));
        assert_eq!(
            lines,
            vec![
                (Level::INFO, "Mood: Conflict".to_string()),
                (Level::INFO, "INFO curated".to_string()),
            ]
        );
    }

    #[test]
    fn test_failed_cycle_relays_stderr_as_warnings() {
        let lines = relayed_lines(&output(1, "partial\n", "Error: library missing\n"));
        assert_eq!(
            lines,
            vec![
                (Level::INFO, "partial".to_string()),
                (Level::WARN, "Error: library missing".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_runs_requested_number_of_cycles() {
        let scheduler = sh("echo curated").with_max_cycles(Some(3));

        let summary = scheduler.run_until(std::future::pending()).await.unwrap();
        assert_eq!(summary, ScheduleSummary { cycles: 3, failures: 0 });
    }

    #[tokio::test]
    async fn test_failed_cycles_do_not_stop_the_loop() {
        let scheduler = sh("echo broken >&2; exit 3").with_max_cycles(Some(2));

        let summary = scheduler.run_until(std::future::pending()).await.unwrap();
        assert_eq!(summary, ScheduleSummary { cycles: 2, failures: 2 });
    }

    #[tokio::test]
    async fn test_missing_program_counts_as_failure() {
        let scheduler = Scheduler::new("/nonexistent/anima", vec![], Duration::ZERO)
            .with_max_cycles(Some(1));

        let summary = scheduler.run_until(std::future::pending()).await.unwrap();
        assert_eq!(summary.failures, 1);
    }

    #[tokio::test]
    async fn test_shutdown_during_sleep_stops_before_next_cycle() {
        let scheduler = Scheduler::new(
            "sh",
            vec!["-c".to_string(), "true".to_string()],
            Duration::from_secs(3600),
        );

        let shutdown = tokio::time::sleep(Duration::from_millis(200));
        let summary = scheduler.run_until(shutdown).await.unwrap();
        assert_eq!(summary, ScheduleSummary { cycles: 1, failures: 0 });
    }
}
