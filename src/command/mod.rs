//! Native command construction and execution.
//!
//! Commands are built as explicit argument lists, never as shell strings;
//! the rendered single-line form exists only for logs and error messages.
//! Flag order is fixed: user options first, then the mode flag, then the
//! artifact or name-version argument.

use std::time::Duration;

use log::info;

use crate::error::ReconcileError;
use crate::plan::Action;
use crate::runtime::Runtime;

/// One fully-assembled native tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Single-line form for logs and diagnostics, space-joined.
    pub fn render(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Render `action` into the exact rpm invocation, or `None` for `NoOp`.
///
/// `options` is whitespace-tokenized into individual arguments; the
/// execution seam takes an argv vector, not a shell string.
pub fn build(action: &Action, tool: &str, options: Option<&str>) -> Option<CommandLine> {
    let mut args: Vec<String> = options
        .map(|opts| opts.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    match action {
        Action::NoOp => return None,
        Action::Install { artifact } => {
            args.push("-i".to_string());
            args.push(artifact.clone());
        }
        Action::Upgrade { artifact } => {
            args.push("-U".to_string());
            args.push(artifact.clone());
        }
        Action::Downgrade { artifact } => {
            args.push("-U".to_string());
            args.push("--oldpackage".to_string());
            args.push(artifact.clone());
        }
        Action::Remove { name, version } => {
            args.push("-e".to_string());
            args.push(format!("{}-{}", name, version));
        }
    }

    Some(CommandLine {
        program: tool.to_string(),
        args,
    })
}

/// Run the built command. The sole mutating step of a pass.
///
/// Any non-success outcome (non-zero exit, signal death, spawn failure,
/// timeout) surfaces as `ExecFailed` with the captured output verbatim.
pub async fn execute<R: Runtime>(
    runtime: &R,
    cmd: &CommandLine,
    timeout: Duration,
) -> Result<(), ReconcileError> {
    info!("running {}", cmd.render());
    let output = runtime
        .run(&cmd.program, &cmd.args, timeout)
        .await
        .map_err(|err| ReconcileError::ExecFailed {
            command: cmd.render(),
            output: err.to_string(),
        })?;
    if !output.success() {
        return Err(ReconcileError::ExecFailed {
            command: cmd.render(),
            output: output.combined(),
        });
    }
    Ok(())
}
