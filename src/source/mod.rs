//! Source classification for package artifacts.
//!
//! A declared source can be a local package file, a remote or file URI
//! handed off to rpm (or a fetching collaborator), or absent entirely.
//! When no source is declared but the package name itself looks like a
//! path, the name doubles as the artifact reference.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ReconcileError;
use crate::runtime::Runtime;

/// URI schemes rpm and its fetch collaborators understand.
const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "ftp", "file"];

/// Classified artifact reference for one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// No artifact reference available; install-class actions will fail
    /// with `MissingSource`.
    None,
    /// A package file on the local filesystem, verified to exist.
    LocalPath(PathBuf),
    /// A remote or file URI, accepted without a local existence check.
    Uri(String),
}

impl SourceRef {
    /// The string handed to artifact-referencing rpm invocations.
    pub fn artifact(&self) -> Option<String> {
        match self {
            SourceRef::None => None,
            SourceRef::LocalPath(path) => Some(path.display().to_string()),
            SourceRef::Uri(uri) => Some(uri.clone()),
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::None => write!(f, "(no source)"),
            SourceRef::LocalPath(path) => write!(f, "{}", path.display()),
            SourceRef::Uri(uri) => write!(f, "{}", uri),
        }
    }
}

/// Classify the declared source for `name`.
///
/// The only I/O performed is an existence check for local paths, routed
/// through the runtime seam.
pub fn classify<R: Runtime>(
    runtime: &R,
    source: Option<&str>,
    name: &str,
) -> Result<SourceRef, ReconcileError> {
    match source {
        Some(src) => {
            if let Some(scheme) = uri_scheme(src) {
                if SUPPORTED_SCHEMES.contains(&scheme.to_lowercase().as_str()) {
                    Ok(SourceRef::Uri(src.to_string()))
                } else {
                    Err(ReconcileError::UnsupportedSourceScheme {
                        scheme: scheme.to_string(),
                        uri: src.to_string(),
                    })
                }
            } else {
                local_path(runtime, src)
            }
        }
        None if path_like(name) => local_path(runtime, name),
        None => Ok(SourceRef::None),
    }
}

/// Extract the URI scheme, if any. Single letters are not schemes so that
/// Windows drive paths like `C:\pkg.rpm` classify as local paths.
fn uri_scheme(s: &str) -> Option<&str> {
    let colon = s.find(':')?;
    let scheme = &s[..colon];
    if scheme.len() < 2 || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
    {
        return None;
    }
    // Require the :// form; a bare colon is not a URI
    s[colon..].starts_with("://").then_some(scheme)
}

/// A name stands in for a source when it looks like a path to a package
/// file rather than a bare package name.
fn path_like(name: &str) -> bool {
    name.contains('/')
        || name.contains(std::path::MAIN_SEPARATOR)
        || name.ends_with(".rpm")
}

fn local_path<R: Runtime>(runtime: &R, raw: &str) -> Result<SourceRef, ReconcileError> {
    let path = PathBuf::from(raw);
    if runtime.exists(Path::new(raw)) {
        Ok(SourceRef::LocalPath(path))
    } else {
        Err(ReconcileError::SourceNotFound(path))
    }
}
