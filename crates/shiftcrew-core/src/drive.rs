//! Filesystem-backed drive for local and offline operation.
//!
//! Logical folder paths from the upload service map onto a directory tree
//! under the configured root. "Publishing" a folder returns a `file://` link
//! — good enough for a single-host deployment and for drills.

use crate::error::{Result, ShiftError};
use crate::io;
use crate::upload::DriveStore;
use std::path::{Path, PathBuf};

pub struct LocalDrive {
    root: PathBuf,
}

impl LocalDrive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, logical: &str) -> PathBuf {
        self.root.join(logical.trim_start_matches('/'))
    }
}

impl DriveStore for LocalDrive {
    fn ensure_folder(&mut self, path: &str) -> Result<()> {
        io::ensure_dir(&self.resolve(path))
            .map_err(|e| ShiftError::UploadUnavailable(e.to_string()))
    }

    fn store_file(
        &mut self,
        folder: &str,
        name: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<()> {
        let target = self.resolve(folder).join(name);
        io::atomic_write(&target, bytes).map_err(|e| ShiftError::UploadUnavailable(e.to_string()))
    }

    fn publish_folder(&mut self, path: &str) -> Result<String> {
        let target = self.resolve(path);
        if !target.is_dir() {
            return Err(ShiftError::UploadUnavailable(format!(
                "folder does not exist: {}",
                target.display()
            )));
        }
        Ok(format!("file://{}", absolute(&target).display()))
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
