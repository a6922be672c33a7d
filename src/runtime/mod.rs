//! Runtime abstraction for host operations.
//!
//! This module provides a trait-based abstraction over the two host
//! capabilities the reconciler needs, enabling dependency injection and
//! testability.
//!
//! # Structure
//!
//! - `process` - Bounded external process execution
//! - `fs` - Filesystem existence check

mod fs;
mod process;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Captured result of one external command invocation.
///
/// `status` is `None` when the process was terminated by a signal rather
/// than exiting. Both streams are captured as lossy UTF-8.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout and stderr joined for diagnostics, trimmed of trailing
    /// whitespace.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out.trim_end().to_string()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Run an external command and capture its exit status and output.
    ///
    /// Must honor `timeout` by failing the call rather than hanging; a
    /// timed-out invocation is an `Err`, never a partial success.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutput>;

    fn exists(&self, path: &Path) -> bool;
}

pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutput> {
        self.run_impl(program, args, timeout).await
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_output_success() {
        let out = ProcessOutput {
            status: Some(0),
            ..Default::default()
        };
        assert!(out.success());

        let out = ProcessOutput {
            status: Some(1),
            ..Default::default()
        };
        assert!(!out.success());

        // Killed by signal: no exit code, not a success
        let out = ProcessOutput {
            status: None,
            ..Default::default()
        };
        assert!(!out.success());
    }

    #[test]
    fn test_process_output_combined() {
        let out = ProcessOutput {
            status: Some(1),
            stdout: "package foo is not installed\n".into(),
            stderr: "error: some warning\n".into(),
        };
        assert_eq!(
            out.combined(),
            "package foo is not installed\nerror: some warning"
        );
    }

    #[test]
    fn test_process_output_combined_stderr_only() {
        let out = ProcessOutput {
            status: Some(1),
            stdout: String::new(),
            stderr: "error: cannot open db\n".into(),
        };
        assert_eq!(out.combined(), "error: cannot open db");
    }
}
