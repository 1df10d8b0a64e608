//! Material evidence upload.
//!
//! Files for a shift land in a folder keyed by date and row/identifier:
//! `<root>/<date>/row_<row>_uid_<identifier>/`. The service pushes the whole
//! batch, then optionally publishes the folder. Batch semantics are
//! all-or-nothing with explicit reporting: a mid-batch failure aborts and
//! names the files that did make it, so the operator can retry cleanly.

use crate::error::{Result, ShiftError};
use crate::store::normalize_identifier;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// DriveStore
// ---------------------------------------------------------------------------

/// Narrow contract against the hierarchical blob backend.
pub trait DriveStore {
    /// Create a folder, parents included. An existing folder is not an error.
    fn ensure_folder(&mut self, path: &str) -> Result<()>;

    /// Store one blob under `folder` with a stable name.
    fn store_file(
        &mut self,
        folder: &str,
        name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()>;

    /// Request a shareable link for a folder.
    fn publish_folder(&mut self, path: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// MaterialFile / MaterialReference
// ---------------------------------------------------------------------------

/// One blob submitted for upload. The name is kept as given — the driver
/// assigns stable names so a retried batch overwrites rather than duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl MaterialFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// The durable result of an upload, written back to the row's material cell.
/// Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialReference {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl MaterialReference {
    /// The string form recorded in the sheet: the public URL when one was
    /// issued, the private path otherwise.
    pub fn as_cell_value(&self) -> &str {
        self.public_url.as_deref().unwrap_or(&self.path)
    }
}

/// Target folder for a shift's materials.
pub fn material_folder(root: &str, date: NaiveDate, row: u32, identifier: &str) -> String {
    format!(
        "{}/{}/row_{}_uid_{}",
        root.trim_end_matches('/'),
        date.format("%Y-%m-%d"),
        row,
        normalize_identifier(identifier)
    )
}

// ---------------------------------------------------------------------------
// MaterialUploadService
// ---------------------------------------------------------------------------

pub struct MaterialUploadService<D: DriveStore> {
    drive: D,
    root: String,
    publish: bool,
}

impl<D: DriveStore> MaterialUploadService<D> {
    /// `publish` is a static configuration choice: when off, no link is ever
    /// requested and references carry only the private path.
    pub fn new(drive: D, root: impl Into<String>, publish: bool) -> Self {
        Self {
            drive,
            root: root.into(),
            publish,
        }
    }

    pub fn drive_mut(&mut self) -> &mut D {
        &mut self.drive
    }

    pub fn upload(
        &mut self,
        date: NaiveDate,
        row: u32,
        identifier: &str,
        files: &[MaterialFile],
    ) -> Result<MaterialReference> {
        let folder = material_folder(&self.root, date, row, identifier);
        self.drive.ensure_folder(&folder)?;

        let mut saved: Vec<String> = Vec::with_capacity(files.len());
        for file in files {
            if let Err(err) =
                self.drive
                    .store_file(&folder, &file.name, &file.bytes, &file.content_type())
            {
                return Err(ShiftError::UploadIncomplete {
                    saved,
                    failed: file.name.clone(),
                    message: err.to_string(),
                });
            }
            saved.push(file.name.clone());
        }
        info!(folder = %folder, files = saved.len(), "material batch stored");

        let public_url = if self.publish {
            match self.drive.publish_folder(&folder) {
                Ok(url) => Some(url),
                Err(err) => {
                    // Degrade to the private path; the batch itself is safe.
                    warn!(folder = %folder, error = %err, "publish failed, keeping private path");
                    None
                }
            }
        } else {
            None
        };

        Ok(MaterialReference {
            path: folder,
            public_url,
            uploaded_at: Utc::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
