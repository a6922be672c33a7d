//! Reconciliation pass orchestration.
//!
//! One pass runs the pipeline once: classify the source, probe the
//! candidate artifact and the installed database, plan the single
//! converging action, build the native command, and execute it. Nothing
//! persists across passes except the host's own package database, and no
//! step is retried internally.

use std::time::Duration;

use log::debug;
use serde::Serialize;

use crate::command;
use crate::error::ReconcileError;
use crate::plan::{self, ActionKind};
use crate::probe::{InstalledState, Prober};
use crate::runtime::Runtime;
use crate::source::{self, SourceRef};

/// Probe and mutation commands share one fixed timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(900);

/// Desired state for a single package, immutable for one pass.
#[derive(Debug, Clone, Default)]
pub struct PackageSpec {
    /// Package identity as known to the system; may itself be a path to
    /// the artifact.
    pub name: String,
    /// Local path, URI, or absent.
    pub source: Option<String>,
    /// Desired version-release; absent means "present at any version".
    pub version: Option<String>,
    /// Extra command-line flags, passed through to every mutating command.
    pub options: Option<String>,
    pub allow_downgrade: bool,
}

impl PackageSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Caller-visible result of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// What the pass did to converge.
    pub action: ActionKind,
    /// Effective installed version after the pass, when determinable.
    pub version: Option<String>,
}

/// Runs one reconciliation pass per call against a fixed tool binary.
pub struct Reconciler<'a, R: Runtime> {
    runtime: &'a R,
    tool: String,
    timeout: Duration,
}

impl<'a, R: Runtime> Reconciler<'a, R> {
    pub fn new(runtime: &'a R, tool: impl Into<String>, timeout: Duration) -> Self {
        Self {
            runtime,
            tool: tool.into(),
            timeout,
        }
    }

    fn prober(&self) -> Prober<'_, R> {
        Prober::new(self.runtime, &self.tool, self.timeout)
    }

    /// Converge towards the package being installed at the desired version.
    pub async fn ensure_installed(
        &self,
        spec: &PackageSpec,
    ) -> Result<Outcome, ReconcileError> {
        let source = source::classify(self.runtime, spec.source.as_deref(), &spec.name)?;
        debug!("{}: source classified as {}", spec.name, source);

        let prober = self.prober();
        let candidate = match source.artifact() {
            Some(artifact) => prober.candidate(&artifact).await,
            None => None,
        };
        if let Some(candidate) = &candidate {
            debug!(
                "{}: candidate artifact provides {} {}",
                spec.name, candidate.name, candidate.version
            );
        }

        // The declared version wins; otherwise enforce whatever the
        // artifact itself carries.
        let desired = spec
            .version
            .clone()
            .or(candidate.map(|c| c.version));

        let installed = prober.installed(&spec.name).await;
        debug!("{}: installed state {:?}", spec.name, installed);

        let artifact = source
            .artifact()
            .unwrap_or_else(|| spec.name.clone());
        let action = plan::plan_install(
            &spec.name,
            &installed,
            desired.as_deref(),
            spec.allow_downgrade,
            &artifact,
        )?;

        // Anything except NoOp out of the install planner references the
        // artifact, which a bare name cannot supply.
        if action.kind() != ActionKind::NoOp && source == SourceRef::None {
            return Err(ReconcileError::MissingSource(spec.name.clone()));
        }

        match command::build(&action, &self.tool, spec.options.as_deref()) {
            None => {
                debug!("{}: already in desired state", spec.name);
                let version = match installed {
                    InstalledState::Present { version } => Some(version),
                    _ => None,
                };
                Ok(Outcome {
                    action: ActionKind::NoOp,
                    version,
                })
            }
            Some(cmd) => {
                command::execute(self.runtime, &cmd, self.timeout).await?;
                // Report what the database holds now, not what was planned
                let version = match self.prober().installed(&spec.name).await {
                    InstalledState::Present { version } => Some(version),
                    _ => desired,
                };
                Ok(Outcome {
                    action: action.kind(),
                    version,
                })
            }
        }
    }

    /// Converge towards the package being absent.
    pub async fn ensure_removed(
        &self,
        spec: &PackageSpec,
    ) -> Result<Outcome, ReconcileError> {
        let installed = self.prober().installed(&spec.name).await;
        debug!("{}: installed state {:?}", spec.name, installed);

        let action = plan::plan_remove(&spec.name, &installed)?;
        match command::build(&action, &self.tool, spec.options.as_deref()) {
            None => {
                debug!("{}: already absent", spec.name);
                Ok(Outcome {
                    action: ActionKind::NoOp,
                    version: None,
                })
            }
            Some(cmd) => {
                command::execute(self.runtime, &cmd, self.timeout).await?;
                Ok(Outcome {
                    action: action.kind(),
                    version: None,
                })
            }
        }
    }

    /// Read-only query surface: the installed version, if any.
    pub async fn installed_version(
        &self,
        name: &str,
    ) -> Result<Option<String>, ReconcileError> {
        match self.prober().installed(name).await {
            InstalledState::Present { version } => Ok(Some(version)),
            InstalledState::Absent => Ok(None),
            InstalledState::QueryFailed => Err(ReconcileError::UnableToDetermineVersion {
                name: name.to_string(),
            }),
        }
    }
}
