//! Vector index persisted as JSON lines

use std::fmt::Debug;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::flat::FlatCollection;
use crate::domain::vector_index::{IndexedRecord, ScoredPayload, VectorIndex};
use crate::domain::DomainError;

#[derive(Debug)]
struct FileState<P> {
    collection: FlatCollection<P>,
    writer: File,
}

/// Flat index whose records live in `<dir>/<collection>.jsonl`.
///
/// Each record is one line. Inserts are synced to disk before they return,
/// so a record acknowledged by `insert` survives a restart.
#[derive(Debug)]
pub struct FileVectorIndex<P> {
    path: PathBuf,
    state: Mutex<FileState<P>>,
    _payload: PhantomData<fn() -> P>,
}

fn storage_error(action: &str, path: &Path, error: impl std::fmt::Display) -> DomainError {
    DomainError::storage(format!("Failed to {} {}: {}", action, path.display(), error))
}

async fn open_append(path: &Path) -> Result<File, DomainError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| storage_error("open", path, e))
}

impl<P> FileVectorIndex<P>
where
    P: Clone + Serialize + DeserializeOwned,
{
    /// Open or create the collection, loading any records already on disk
    pub async fn open(
        persist_location: impl AsRef<Path>,
        collection: &str,
    ) -> Result<Self, DomainError> {
        let dir = persist_location.as_ref();
        fs::create_dir_all(dir)
            .await
            .map_err(|e| storage_error("create directory", dir, e))?;

        let path = dir.join(format!("{}.jsonl", collection));
        let collection = Self::load(&path).await?;

        info!(
            path = %path.display(),
            records = collection.len(),
            "Opened vector collection"
        );

        let writer = open_append(&path).await?;

        Ok(Self {
            path,
            state: Mutex::new(FileState { collection, writer }),
            _payload: PhantomData,
        })
    }

    async fn load(path: &Path) -> Result<FlatCollection<P>, DomainError> {
        let mut collection = FlatCollection::default();

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(collection),
            Err(e) => return Err(storage_error("read", path, e)),
        };

        let mut lines = BufReader::new(file).lines();
        let mut line_number = 0usize;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| storage_error("read", path, e))?
        {
            line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            let parsed = serde_json::from_str::<IndexedRecord<P>>(&line)
                .map_err(|e| e.to_string())
                .and_then(|record| collection.push(record).map_err(|e| e.to_string()));

            if let Err(e) = parsed {
                warn!(
                    path = %path.display(),
                    line = line_number,
                    error = %e,
                    "Skipping unreadable vector record"
                );
            }
        }

        Ok(collection)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(state: &mut FileState<P>, path: &Path, line: &str) -> Result<(), DomainError> {
        state
            .writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| storage_error("write", path, e))?;
        state
            .writer
            .flush()
            .await
            .map_err(|e| storage_error("flush", path, e))?;
        state
            .writer
            .sync_data()
            .await
            .map_err(|e| storage_error("sync", path, e))
    }

    fn encode(record: &IndexedRecord<P>) -> Result<String, DomainError> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| DomainError::storage(format!("Failed to encode record: {}", e)))?;
        line.push('\n');
        Ok(line)
    }
}

#[async_trait]
impl<P> VectorIndex<P> for FileVectorIndex<P>
where
    P: Clone + Serialize + DeserializeOwned + Send + Sync + Debug + 'static,
{
    async fn search_nearest(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPayload<P>>, DomainError> {
        self.state.lock().await.collection.nearest(vector, k)
    }

    async fn insert(&self, vector: Vec<f32>, payload: P) -> Result<(), DomainError> {
        let record = IndexedRecord::new(vector, payload);
        let line = Self::encode(&record)?;

        let mut state = self.state.lock().await;
        state.collection.check(&record.vector)?;
        Self::append(&mut state, &self.path, &line).await?;
        state.collection.push(record)
    }

    async fn insert_batch(&self, records: Vec<IndexedRecord<P>>) -> Result<usize, DomainError> {
        let count = records.len();

        if count == 0 {
            return Ok(0);
        }

        let mut lines = String::new();
        for record in &records {
            lines.push_str(&Self::encode(record)?);
        }

        let mut state = self.state.lock().await;

        let expected = state
            .collection
            .dimension()
            .unwrap_or(records[0].vector.len());
        if let Some(bad) = records.iter().find(|r| r.vector.is_empty() || r.vector.len() != expected) {
            return Err(DomainError::validation(format!(
                "Vector dimension mismatch: collection has {}, got {}",
                expected,
                bad.vector.len()
            )));
        }

        Self::append(&mut state, &self.path, &lines).await?;

        for record in records {
            state.collection.push(record)?;
        }

        debug!(path = %self.path.display(), count, "Appended vector records");
        Ok(count)
    }

    async fn drop_and_recreate(&self) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;

        // Memory follows disk as soon as the file is truncated
        let truncated = File::create(&self.path)
            .await
            .map_err(|e| storage_error("truncate", &self.path, e))?;
        state.collection.clear();

        truncated
            .sync_all()
            .await
            .map_err(|e| storage_error("sync", &self.path, e))?;

        state.writer = open_append(&self.path).await?;

        info!(path = %self.path.display(), "Recreated vector collection");
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.state.lock().await.collection.len())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
