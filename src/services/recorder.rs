use crate::adapters::local_store::{LocalSubmissionStore, StoreError, StoredSubmission};
use crate::domain::submission::SubmissionRequest;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to persist submission: {0}")]
    Store(#[from] StoreError),
}

/// Persists a submission before anyone is notified about it.
#[async_trait]
pub trait SubmissionRecorder: Send + Sync + std::fmt::Debug {
    /// # Errors
    /// Returns `RecordError` if the submission could not be stored.
    async fn record(&self, request: &SubmissionRequest) -> Result<(), RecordError>;
}

/// Stand-in for a real datastore. Logs the submission and reports success.
#[derive(Debug, Default)]
pub struct PlaceholderRecorder;

#[async_trait]
impl SubmissionRecorder for PlaceholderRecorder {
    async fn record(&self, request: &SubmissionRequest) -> Result<(), RecordError> {
        tracing::info!(
            handle = %request.handle,
            category = %request.category,
            "STUB: Recording submission"
        );
        Ok(())
    }
}

/// Appends preview submissions to the local submission store.
#[derive(Debug)]
pub struct LocalStoreRecorder {
    store: Arc<LocalSubmissionStore>,
}

impl LocalStoreRecorder {
    #[must_use]
    pub const fn new(store: Arc<LocalSubmissionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SubmissionRecorder for LocalStoreRecorder {
    #[tracing::instrument(level = "debug", skip_all, err(level = "warn"))]
    async fn record(&self, request: &SubmissionRequest) -> Result<(), RecordError> {
        let record = StoredSubmission::from_request(request, OffsetDateTime::now_utc());
        let count = self.store.append(record).await?;
        tracing::info!(count, path = %self.store.path().display(), "Submission saved to local store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::FormCategory;

    fn request() -> SubmissionRequest {
        SubmissionRequest {
            name: "Ana".into(),
            surname: "Pop".into(),
            email: "ana@example.com".into(),
            handle: "@ana.pop".into(),
            category: FormCategory::Consultation,
        }
    }

    #[tokio::test]
    async fn test_placeholder_always_succeeds() {
        PlaceholderRecorder.record(&request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_local_store_recorder_appends() {
        let path = std::env::temp_dir().join(format!("starcast-recorder-{}.json", uuid::Uuid::new_v4()));
        let store = Arc::new(LocalSubmissionStore::new(&path));
        let recorder = LocalStoreRecorder::new(Arc::clone(&store));

        recorder.record(&request()).await.unwrap();

        let stored = store.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].handle, "@ana.pop");
        assert_eq!(stored[0].category, FormCategory::Consultation);

        let _ = std::fs::remove_file(path);
    }
}
