//! Upload storage: deterministic date-stamped names under a single directory.
//!
//! Storage names are `MMDDYYYY-<sanitized original name>`. Sanitization keeps
//! only ASCII letters, digits and periods. Two uploads on the same calendar
//! day with the same sanitized name overwrite each other - last write wins is
//! the documented behavior of the date-only naming scheme.

use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Public route prefix stored files are served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// A file persisted by [`UploadStore::save`].
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Name of the file inside the upload directory
    pub storage_name: String,
    /// Path the file is served at, e.g. `/uploads/03072024-photo.png`
    pub public_path: String,
}

/// Owns the upload directory. All writes go through [`UploadStore::save`];
/// reads are served straight from disk by the static file route.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create the store, creating the upload directory if it does not exist.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic storage name for an upload received on `date`.
    pub fn storage_name(original: &str, date: NaiveDate) -> String {
        format!("{}-{}", date.format("%m%d%Y"), sanitize(original))
    }

    /// Write the uploaded bytes under their date-stamped name and return the
    /// public path the file is now served at.
    pub async fn save(&self, original: &str, bytes: &[u8]) -> Result<StoredFile> {
        let storage_name = Self::storage_name(original, Utc::now().date_naive());
        tokio::fs::write(self.root.join(&storage_name), bytes).await?;
        Ok(StoredFile {
            public_path: format!("{PUBLIC_PREFIX}/{storage_name}"),
            storage_name,
        })
    }
}

/// Strip every character that is not an ASCII letter, digit, or period.
fn sanitize(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '.').collect()
}
