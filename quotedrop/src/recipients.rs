//! Flat-file recipient list with single-writer semantics.
//!
//! The list is one email address per line. Blank lines are filtered on every
//! read and a missing file reads as an empty list. Duplicate detection and
//! removal compare case-insensitively after trimming; the stored casing is
//! preserved. Every operation is serialized through an internal mutex so
//! concurrent handlers cannot interleave read-modify-write cycles on the
//! shared file.
//!
//! Membership checks are a full-file linear scan. That is an intentional
//! choice at this data scale, not an oversight.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::errors::{Error, Result};

/// Single `@`, whitespace-free local part and dotted domain.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

pub struct RecipientStore {
    path: PathBuf,
    // Serializes every read-modify-write cycle on the shared file
    lock: Mutex<()>,
}

impl RecipientStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Ordered list of stored addresses. Never errors on a missing file.
    pub async fn list(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock().await;
        self.read_lines().await
    }

    /// Append `email` if it passes the shape check and is not already stored.
    pub async fn add(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if !EMAIL_RE.is_match(email) {
            return Err(Error::Validation {
                message: format!("'{email}' is not a valid email address"),
            });
        }

        let _guard = self.lock.lock().await;
        let existing = self.read_lines().await?;
        if existing.iter().any(|stored| eq_fold(stored, email)) {
            return Err(Error::Duplicate {
                message: "Email already exists".to_string(),
            });
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{email}\n").as_bytes()).await?;

        Ok(())
    }

    /// Remove every line matching any of `emails` and rewrite the file.
    /// Errors with `NotFound` when no line matched; returns the updated list
    /// otherwise.
    pub async fn remove(&self, emails: &[String]) -> Result<Vec<String>> {
        if emails.is_empty() {
            return Err(Error::Validation {
                message: "No email provided".to_string(),
            });
        }

        let _guard = self.lock.lock().await;
        let existing = self.read_lines().await?;
        let remaining: Vec<String> = existing
            .iter()
            .filter(|stored| !emails.iter().any(|e| eq_fold(stored, e)))
            .cloned()
            .collect();

        if remaining.len() == existing.len() {
            return Err(Error::NotFound {
                resource: "Email".to_string(),
                id: emails.join(", "),
            });
        }

        let mut contents = remaining.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        tokio::fs::write(&self.path, contents).await?;

        Ok(remaining)
    }

    async fn read_lines(&self) -> Result<Vec<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ok(data
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

fn eq_fold(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
