//! Temp directory allocation and scoped cleanup of cloned repositories

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Allocates uniquely named directories under a root.
#[derive(Debug, Clone)]
pub struct TempWorkspace {
    root: PathBuf,
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl TempWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create `<root>/gh-fetch-<prefix>-<pid>-<nanos>-<n>`.
    pub fn make_dir(&self, prefix: &str) -> Result<PathBuf> {
        let nanos =
            SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
        let pid = std::process::id();
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = self.root.join(format!("gh-fetch-{prefix}-{pid}-{nanos}-{seq}"));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Remove a directory tree, logging rather than failing when it is already gone.
    pub fn cleanup(&self, path: &Path) {
        if let Err(e) = std::fs::remove_dir_all(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove temp directory {}: {}", path.display(), e);
            }
        }
    }

    /// Allocate a directory owned by the returned guard.
    pub fn scoped(&self, prefix: &str) -> Result<ClonedRepo> {
        Ok(ClonedRepo::new(self.make_dir(prefix)?, true))
    }
}

/// A path on disk, removed on drop when it is a temp directory we allocated.
#[derive(Debug)]
pub struct ClonedRepo {
    path: PathBuf,
    is_temp: bool,
}

impl ClonedRepo {
    pub fn new(path: PathBuf, is_temp: bool) -> Self {
        Self { path, is_temp }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temp(&self) -> bool {
        self.is_temp
    }

    /// Give up ownership; the directory outlives the guard.
    pub fn keep(mut self) -> PathBuf {
        self.is_temp = false;
        std::mem::take(&mut self.path)
    }
}

impl AsRef<Path> for ClonedRepo {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for ClonedRepo {
    fn drop(&mut self) {
        if self.is_temp {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
