//! Typed failure reasons for a reconciliation pass.
//!
//! Every way a pass can fail is one of these variants; nothing is retried
//! internally and there is no partial-success state. `ExecFailed` carries
//! the native tool's captured output verbatim so operators can diagnose
//! without re-running rpm by hand.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The declared local source path does not exist on disk.
    #[error("source {} does not exist", .0.display())]
    SourceNotFound(PathBuf),

    /// The source URI uses a scheme outside the recognized set
    /// (http, https, ftp, file).
    #[error("unsupported source scheme '{scheme}' in '{uri}'")]
    UnsupportedSourceScheme { scheme: String, uri: String },

    /// An install or upgrade was requested with no usable artifact reference.
    #[error("a source is required to install {0}")]
    MissingSource(String),

    /// The installed-state probe could not produce a determinate answer.
    /// Never silently treated as "not installed".
    #[error("Unable to determine current version of {name} due to a package-tool failure")]
    UnableToDetermineVersion { name: String },

    /// The desired version orders before the installed version and
    /// downgrade permission was not granted.
    #[error("cannot downgrade {name} from {installed} to {desired} without allow-downgrade")]
    DowngradeNotAllowed {
        name: String,
        installed: String,
        desired: String,
    },

    /// The mutating command failed or timed out.
    #[error("command `{command}` failed: {output}")]
    ExecFailed { command: String, output: String },
}
