//! Filesystem operations.

use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use std::path::Path;

    #[test]
    fn test_exists() {
        let runtime = RealRuntime;
        let dir = tempfile::tempdir().unwrap();
        assert!(runtime.exists(dir.path()));
        assert!(!runtime.exists(&dir.path().join("missing.rpm")));
        assert!(!runtime.exists(Path::new("/no/such/path/anywhere")));
    }
}
