//! Timed subprocess execution

use std::io;
use std::process::{Command, ExitStatus};
use std::time::{Duration, Instant};

/// Captured result of [`run_timed`].
#[derive(Debug, Clone)]
pub struct TimedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub elapsed: Duration,
}

impl TimedOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, `None` when terminated by a signal.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn elapsed_hms(&self) -> String {
        format_elapsed(self.elapsed)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Run `command` to completion, capturing its output and wall-clock time.
pub fn run_timed(command: &mut Command) -> io::Result<TimedOutput> {
    let program = command.get_program().to_string_lossy().into_owned();
    let start = Instant::now();
    let output = command.output()?;
    let elapsed = start.elapsed();

    tracing::debug!(
        program = %program,
        status = %output.status,
        elapsed = %format_elapsed(elapsed),
        "Command finished"
    );

    Ok(TimedOutput { status: output.status, stdout: output.stdout, stderr: output.stderr, elapsed })
}

/// `HH:MM:SS`; hours keep counting past 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", total / 3600, total % 3600 / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_millis(61_900)), "00:01:01");
        assert_eq!(format_elapsed(Duration::from_secs(3 * 3600 + 25 * 60 + 7)), "03:25:07");
        assert_eq!(format_elapsed(Duration::from_secs(26 * 3600)), "26:00:00");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_timed_success() {
        let out = run_timed(Command::new("sh").args(["-c", "echo hello; echo oops >&2"]))
            .expect("run");
        assert!(out.success());
        assert_eq!(out.code(), Some(0));
        assert_eq!(out.stdout_lossy(), "hello\n");
        assert_eq!(out.stderr_lossy(), "oops\n");

        let hms = out.elapsed_hms();
        assert_eq!(hms.len(), 8);
        assert!(hms.chars().enumerate().all(|(i, c)| if i == 2 || i == 5 {
            c == ':'
        } else {
            c.is_ascii_digit()
        }));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_timed_failure_code() {
        let out = run_timed(Command::new("sh").args(["-c", "exit 3"])).expect("run");
        assert!(!out.success());
        assert_eq!(out.code(), Some(3));
    }

    #[test]
    fn test_missing_program_is_error() {
        assert!(run_timed(&mut Command::new("dml-common-no-such-program")).is_err());
    }
}
