//! Per-request scratch workspace.
//!
//! Every execution request gets a UUID-derived source path (and executable
//! path for compiled languages) under a shared scratch root. Uniqueness of
//! the stem is what makes concurrent requests collision-free without any
//! cross-request locking.

use anyhow::{Context, Result};
use gavel_common::types::Language;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Filesystem footprint of one execution request. The footprint must never
/// outlive the request: release it on every exit path via [`ReleaseGuard`].
#[derive(Debug)]
pub struct Workspace {
    pub dir: PathBuf,
    pub source_path: PathBuf,
    /// Present only for compiled languages.
    pub executable_path: Option<PathBuf>,
}

impl Workspace {
    /// Allocate unique paths under `scratch_root`, creating the root if
    /// absent. The root is shared across requests and never removed here.
    pub fn acquire(scratch_root: &Path, language: Language) -> Result<Self> {
        fs::create_dir_all(scratch_root).with_context(|| {
            format!(
                "failed to create scratch directory {}",
                scratch_root.display()
            )
        })?;

        let stem = Uuid::new_v4().simple().to_string();
        let source_path = scratch_root.join(format!("{}.{}", stem, language.extension()));
        let executable_path = language.is_compiled().then(|| scratch_root.join(&stem));

        Ok(Self {
            dir: scratch_root.to_path_buf(),
            source_path,
            executable_path,
        })
    }

    pub fn write_source(&self, code: &str) -> Result<()> {
        fs::write(&self.source_path, code).with_context(|| {
            format!("failed to write source file {}", self.source_path.display())
        })
    }

    /// Remove every artifact this workspace created. Each removal is
    /// independent: failing to delete one file never blocks the other, and
    /// failures are logged, not raised.
    pub fn release(&self) {
        remove_artifact(&self.source_path);
        if let Some(executable) = &self.executable_path {
            remove_artifact(executable);
        }
    }
}

fn remove_artifact(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "failed to remove scratch artifact");
    }
}

/// Cleanup guard - guarantees workspace release on drop, so the orchestrator
/// cleans up on every exit path including early returns and propagated
/// errors, without duplicated cleanup calls.
pub struct ReleaseGuard<'a>(pub &'a Workspace);

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.0.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_creates_scratch_root() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("scratch");
        assert!(!nested.exists());

        let workspace = Workspace::acquire(&nested, Language::Py).unwrap();
        assert!(nested.exists());
        assert_eq!(workspace.source_path.extension().unwrap(), "py");
        assert!(workspace.executable_path.is_none());
    }

    #[test]
    fn test_compiled_language_gets_executable_path() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire(root.path(), Language::Cpp).unwrap();

        let executable = workspace.executable_path.as_ref().unwrap();
        assert_ne!(executable, &workspace.source_path);
        assert_eq!(workspace.source_path.extension().unwrap(), "cpp");
    }

    #[test]
    fn test_release_removes_all_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire(root.path(), Language::C).unwrap();
        workspace.write_source("int main() { return 0; }\n").unwrap();
        let executable = workspace.executable_path.clone().unwrap();
        fs::write(&executable, b"\x7fELF").unwrap();

        workspace.release();

        assert!(!workspace.source_path.exists());
        assert!(!executable.exists());
        // The shared root stays.
        assert!(root.path().exists());
    }

    #[test]
    fn test_release_tolerates_missing_files() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire(root.path(), Language::Py).unwrap();

        // Nothing was ever written; releasing twice must not panic.
        workspace.release();
        workspace.release();
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire(root.path(), Language::Py).unwrap();
        workspace.write_source("print('hi')\n").unwrap();

        {
            let _guard = ReleaseGuard(&workspace);
            assert!(workspace.source_path.exists());
        }

        assert!(!workspace.source_path.exists());
    }

    #[test]
    fn test_concurrent_acquisitions_never_collide() {
        let root = tempfile::tempdir().unwrap();
        let first = Workspace::acquire(root.path(), Language::Cpp).unwrap();
        let second = Workspace::acquire(root.path(), Language::Cpp).unwrap();

        assert_ne!(first.source_path, second.source_path);
        assert_ne!(first.executable_path, second.executable_path);
    }
}
