//! Action planning.
//!
//! A small decision procedure mapping the probed installed state, the
//! desired version, and the downgrade-permission flag to exactly one
//! action. The planner is pure; all probing has already happened and all
//! command construction happens afterwards.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::ReconcileError;
use crate::probe::InstalledState;
use crate::version;

/// The single action one reconciliation pass may execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NoOp,
    Install { artifact: String },
    Upgrade { artifact: String },
    Downgrade { artifact: String },
    Remove { name: String, version: String },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::NoOp => ActionKind::NoOp,
            Action::Install { .. } => ActionKind::Install,
            Action::Upgrade { .. } => ActionKind::Upgrade,
            Action::Downgrade { .. } => ActionKind::Downgrade,
            Action::Remove { .. } => ActionKind::Remove,
        }
    }
}

/// Payload-free action discriminant, reported in outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    NoOp,
    Install,
    Upgrade,
    Downgrade,
    Remove,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::NoOp => "no-op",
            ActionKind::Install => "installed",
            ActionKind::Upgrade => "upgraded",
            ActionKind::Downgrade => "downgraded",
            ActionKind::Remove => "removed",
        };
        write!(f, "{}", name)
    }
}

/// Plan the action that converges `name` towards being installed at
/// `desired` (no version constraint when `None`).
///
/// `artifact` is the reference install-class commands will use; whether it
/// is actually usable is the caller's `MissingSource` check, not the
/// planner's concern.
pub fn plan_install(
    name: &str,
    installed: &InstalledState,
    desired: Option<&str>,
    allow_downgrade: bool,
    artifact: &str,
) -> Result<Action, ReconcileError> {
    let installed_version = match installed {
        InstalledState::QueryFailed => {
            return Err(ReconcileError::UnableToDetermineVersion {
                name: name.to_string(),
            });
        }
        InstalledState::Absent => {
            return Ok(Action::Install {
                artifact: artifact.to_string(),
            });
        }
        InstalledState::Present { version } => version,
    };

    let Some(desired) = desired else {
        // Present with no version constraint to enforce
        return Ok(Action::NoOp);
    };

    match version::compare(desired, installed_version) {
        Ordering::Equal => Ok(Action::NoOp),
        Ordering::Greater => Ok(Action::Upgrade {
            artifact: artifact.to_string(),
        }),
        Ordering::Less if allow_downgrade => Ok(Action::Downgrade {
            artifact: artifact.to_string(),
        }),
        Ordering::Less => Err(ReconcileError::DowngradeNotAllowed {
            name: name.to_string(),
            installed: installed_version.clone(),
            desired: desired.to_string(),
        }),
    }
}

/// Plan the action that converges `name` towards being removed.
///
/// Removal is version-qualified with the installed version to avoid
/// ambiguity when multiple versions could match the bare name.
pub fn plan_remove(
    name: &str,
    installed: &InstalledState,
) -> Result<Action, ReconcileError> {
    match installed {
        InstalledState::QueryFailed => Err(ReconcileError::UnableToDetermineVersion {
            name: name.to_string(),
        }),
        InstalledState::Absent => Ok(Action::NoOp),
        InstalledState::Present { version } => Ok(Action::Remove {
            name: name.to_string(),
            version: version.clone(),
        }),
    }
}
