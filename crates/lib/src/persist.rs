//! Durable checkpointing of the state tree.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::notify::{Notify, Outcome};

/// Notifier that writes the post-mutation snapshot to a file,
/// overwriting whatever was there.
///
/// Fetches and failed requests carry no snapshot, so only mutating
/// outcomes touch the disk. A write failure is reported to the
/// dispatcher, which logs it; the mutation already happened and the
/// process keeps serving, so the next successful mutation writes a
/// fresh checkpoint.
pub struct FileCheckpoint {
    path: PathBuf,
}

impl FileCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCheckpoint { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl Notify for FileCheckpoint {
    async fn notify(&self, outcome: &Outcome) -> crate::Result<()> {
        let Some(snapshot) = &outcome.snapshot else {
            return Ok(());
        };

        // Reformat for a human-editable file on disk.
        let value: serde_json::Value = serde_json::from_str(snapshot)?;
        let pretty = serde_json::to_string_pretty(&value)?;

        tokio::fs::write(&self.path, pretty).await?;
        debug!(path = %self.path.display(), "state checkpointed");
        Ok(())
    }
}
