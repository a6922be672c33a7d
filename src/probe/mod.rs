//! Package metadata probes.
//!
//! Two read-only rpm queries feed the planner: one against the candidate
//! artifact (`rpm -qp`) and one against the installed package database
//! (`rpm -q`). Both request the same fixed query format so the output
//! parses identically.
//!
//! rpm conflates "nothing found" and "query failed" into non-zero exit
//! codes; the installed-state probe disambiguates them by looking for
//! rpm's own "is not installed" signal and keeps `QueryFailed` as a
//! first-class result rather than defaulting it to `Absent`.

use std::time::Duration;

use log::debug;

use crate::runtime::{ProcessOutput, Runtime};

/// Fixed query format: package name and version-release, newline-terminated.
pub const QUERY_FORMAT: &str = "%{NAME} %{VERSION}-%{RELEASE}\\n";

/// rpm's textual signal for a query that succeeded but found no package.
const NOT_INSTALLED_MARKER: &str = "is not installed";

/// Name and version-release read from the candidate artifact itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMetadata {
    pub name: String,
    pub version: String,
}

/// The package's presence as recorded in the host's package database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstalledState {
    Absent,
    Present { version: String },
    /// The tool could not be brought to a determinate answer: spawn
    /// failure, timeout, unparseable output, or an exit code that is
    /// neither success nor the not-installed signal.
    QueryFailed,
}

/// Read-only prober over the runtime seam. Issues no mutating commands.
pub struct Prober<'a, R: Runtime> {
    runtime: &'a R,
    tool: &'a str,
    timeout: Duration,
}

impl<'a, R: Runtime> Prober<'a, R> {
    pub fn new(runtime: &'a R, tool: &'a str, timeout: Duration) -> Self {
        Self {
            runtime,
            tool,
            timeout,
        }
    }

    /// Query the artifact referenced by `artifact` for its metadata.
    ///
    /// A failed invocation, non-zero exit, or empty output all yield
    /// `None`; the artifact query has no absent/failed distinction to
    /// preserve.
    pub async fn candidate(&self, artifact: &str) -> Option<CandidateMetadata> {
        let args = vec![
            "-qp".to_string(),
            "--queryformat".to_string(),
            QUERY_FORMAT.to_string(),
            artifact.to_string(),
        ];
        let output = match self.runtime.run(self.tool, &args, self.timeout).await {
            Ok(output) => output,
            Err(err) => {
                debug!("candidate query for {} failed to run: {}", artifact, err);
                return None;
            }
        };
        if !output.success() {
            debug!(
                "candidate query for {} exited {:?}: {}",
                artifact,
                output.status,
                output.combined()
            );
            return None;
        }
        parse_query_line(&output.stdout).map(|(name, version)| CandidateMetadata {
            name,
            version,
        })
    }

    /// Query the installed package database for `name`.
    pub async fn installed(&self, name: &str) -> InstalledState {
        let args = vec![
            "-q".to_string(),
            "--queryformat".to_string(),
            QUERY_FORMAT.to_string(),
            name.to_string(),
        ];
        let output = match self.runtime.run(self.tool, &args, self.timeout).await {
            Ok(output) => output,
            Err(err) => {
                debug!("installed query for {} failed to run: {}", name, err);
                return InstalledState::QueryFailed;
            }
        };
        classify_installed_output(name, &output)
    }
}

fn classify_installed_output(name: &str, output: &ProcessOutput) -> InstalledState {
    if output.success() {
        // Success with unparseable output is still indeterminate
        return match parse_query_line(&output.stdout) {
            Some((_, version)) => InstalledState::Present { version },
            None => {
                debug!(
                    "installed query for {} succeeded with unparseable output: {:?}",
                    name, output.stdout
                );
                InstalledState::QueryFailed
            }
        };
    }
    if output.combined().contains(NOT_INSTALLED_MARKER) {
        debug!("{} is not installed", name);
        return InstalledState::Absent;
    }
    debug!(
        "installed query for {} exited {:?}: {}",
        name,
        output.status,
        output.combined()
    );
    InstalledState::QueryFailed
}

/// Parse the first line of query-format output into (name, version-release).
///
/// The version-release field is taken exactly as formatted, tildes and all.
fn parse_query_line(stdout: &str) -> Option<(String, String)> {
    let line = stdout.lines().next()?.trim();
    let (name, version) = line.split_once(char::is_whitespace)?;
    let version = version.trim();
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name.to_string(), version.to_string()))
}
