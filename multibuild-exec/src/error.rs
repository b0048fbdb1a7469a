//! Error types for multibuild-exec.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// An external command did not complete successfully.
///
/// Every variant carries the rendered command and the working directory it
/// ran in, so a single log line is enough to reproduce the failure.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process could not be started or waited on.
    #[error("failed to run `{command}` in {cwd}: {source}")]
    Io {
        command: String,
        cwd: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully.
    #[error("`{command}` failed in {cwd} ({}){}", exit_label(.code), stderr_suffix(.stderr))]
    Failed {
        command: String,
        cwd: PathBuf,
        /// `None` when the process was terminated by a signal.
        code: Option<i32>,
        stderr: String,
    },

    /// The process outlived its timeout and was killed.
    #[error("`{command}` timed out after {}s in {cwd}", .timeout.as_secs())]
    TimedOut {
        command: String,
        cwd: PathBuf,
        timeout: Duration,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_message_includes_code_and_stderr() {
        let err = ExecError::Failed {
            command: "git pull".to_string(),
            cwd: PathBuf::from("/src/x.aep"),
            code: Some(1),
            stderr: "fatal: not a git repository\n".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("`git pull` failed in /src/x.aep"), "{msg}");
        assert!(msg.contains("exit code 1"), "{msg}");
        assert!(msg.ends_with("fatal: not a git repository"), "{msg}");
    }

    #[test]
    fn failed_message_without_stderr_has_no_trailing_colon() {
        let err = ExecError::Failed {
            command: "false".to_string(),
            cwd: PathBuf::from("/tmp"),
            code: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "`false` failed in /tmp (terminated by signal)");
    }

    #[test]
    fn timed_out_message_shows_seconds() {
        let err = ExecError::TimedOut {
            command: "sleep 10".to_string(),
            cwd: PathBuf::from("/tmp"),
            timeout: Duration::from_secs(3),
        };
        assert!(err.to_string().contains("timed out after 3s"));
    }
}
