use crate::domain::submission::{FormCategory, SubmissionRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Key under which the submission list lives inside the store document.
pub const SUBMISSIONS_KEY: &str = "starcast_submissions";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Local store I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Local store is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub handle: String,
    pub category: FormCategory,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl StoredSubmission {
    #[must_use]
    pub fn from_request(req: &SubmissionRequest, date: OffsetDateTime) -> Self {
        Self {
            name: req.name.clone(),
            surname: req.surname.clone(),
            email: req.email.clone(),
            handle: req.handle.clone(),
            category: req.category,
            date,
        }
    }
}

/// A small key-value document on disk that keeps preview submissions.
///
/// Only one key is used; the whole document is rewritten on every change.
#[derive(Debug)]
pub struct LocalSubmissionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

type Document = BTreeMap<String, serde_json::Value>;

impl LocalSubmissionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, doc: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(doc)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn submissions_of(doc: &Document) -> Result<Vec<StoredSubmission>, StoreError> {
        doc.get(SUBMISSIONS_KEY)
            .map_or_else(|| Ok(Vec::new()), |v| serde_json::from_value(v.clone()).map_err(StoreError::from))
    }

    /// Appends a record to the end of the list.
    ///
    /// # Errors
    /// Returns an error if the document cannot be read, parsed, or written.
    pub async fn append(&self, record: StoredSubmission) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;
        let mut submissions = Self::submissions_of(&doc)?;
        submissions.push(record);
        let count = submissions.len();
        doc.insert(SUBMISSIONS_KEY.to_owned(), serde_json::to_value(submissions)?);
        self.write_document(&doc).await?;
        Ok(count)
    }

    /// Returns every stored record, oldest first.
    ///
    /// # Errors
    /// Returns an error if the document cannot be read or parsed.
    pub async fn list(&self) -> Result<Vec<StoredSubmission>, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.read_document().await?;
        Self::submissions_of(&doc)
    }

    /// Drops the submission list and returns how many records it held.
    ///
    /// # Errors
    /// Returns an error if the document cannot be read or written.
    pub async fn clear(&self) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;
        let removed = Self::submissions_of(&doc)?.len();
        if doc.remove(SUBMISSIONS_KEY).is_some() {
            self.write_document(&doc).await?;
        }
        Ok(removed)
    }

    /// Confirms the store's directory is usable.
    ///
    /// # Errors
    /// Returns an error if the existing document is unreadable.
    pub async fn check(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.read_document().await.map(|_| ())
    }
}
