//! Best-effort background index writes.
//!
//! ```text
//! caller ──insert()──► IndexWriter ──spawn──► task ──spawn_blocking──► store
//!    ▲                                          │
//!    └──────────── PendingWrite (oneshot) ◄─────┘  Ok | Err | Timeout
//! ```
//!
//! The caller may await the handle or drop it. A write that misses its
//! deadline is reported as [`Error::Timeout`]; the blocking call itself
//! keeps running to completion, so nothing already committed is undone.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::EmbeddingStore;
use crate::error::{Error, Result};

/// Deadline applied when none is configured.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Kind of background write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// New document.
    Insert,
    /// Replaced document text.
    Update,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOp::Insert => write!(f, "insert"),
            WriteOp::Update => write!(f, "update"),
        }
    }
}

/// Outcome of one background write.
#[derive(Debug)]
pub struct PendingWrite {
    op: WriteOp,
    rx: oneshot::Receiver<Result<()>>,
}

impl PendingWrite {
    /// Kind of write this handle tracks.
    pub fn op(&self) -> WriteOp {
        self.op
    }

    /// Wait for the write to finish or time out.
    pub async fn wait(self) -> Result<()> {
        self.rx
            .await
            .map_err(|_| Error::Other("index write task dropped".into()))?
    }

    /// The outcome if it is already known.
    pub fn try_result(&mut self) -> Option<Result<()>> {
        self.rx.try_recv().ok()
    }
}

/// Dispatches store writes onto tokio's blocking pool with a deadline.
pub struct IndexWriter<S: ?Sized> {
    store: Arc<S>,
    timeout: Duration,
    runtime: Handle,
}

impl<S: ?Sized> fmt::Debug for IndexWriter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexWriter")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<S: EmbeddingStore + ?Sized + 'static> IndexWriter<S> {
    /// Create a writer on the current tokio runtime.
    pub fn new(store: Arc<S>) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::Other(format!("no tokio runtime: {e}")))?;
        Ok(Self::with_handle(store, runtime))
    }

    /// Create a writer on an explicit runtime.
    pub fn with_handle(store: Arc<S>, runtime: Handle) -> Self {
        Self {
            store,
            timeout: DEFAULT_WRITE_TIMEOUT,
            runtime,
        }
    }

    /// Set the per-write deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-write deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Insert in the background.
    pub fn insert(&self, id: impl Into<String>, text: impl Into<String>) -> PendingWrite {
        self.dispatch(WriteOp::Insert, id.into(), text.into())
    }

    /// Update in the background.
    pub fn update(&self, id: impl Into<String>, text: impl Into<String>) -> PendingWrite {
        self.dispatch(WriteOp::Update, id.into(), text.into())
    }

    fn dispatch(&self, op: WriteOp, id: String, text: String) -> PendingWrite {
        let (tx, rx) = oneshot::channel();
        let store = Arc::clone(&self.store);
        let deadline = self.timeout;

        let _task = self.runtime.spawn(async move {
            let log_id = id.clone();
            let job = tokio::task::spawn_blocking(move || match op {
                WriteOp::Insert => store.insert(&id, &text),
                WriteOp::Update => store.update(&id, &text),
            });
            let outcome = match tokio::time::timeout(deadline, job).await {
                Ok(Ok(result)) => result,
                Ok(Err(join)) => Err(Error::Store(format!("index task failed: {join}"))),
                Err(_) => Err(Error::Timeout(deadline)),
            };
            match &outcome {
                Ok(()) => debug!(id = %log_id, %op, "background index write done"),
                Err(err) => warn!(id = %log_id, %op, error = %err, "background index write failed"),
            }
            // Receiver may have been dropped.
            let _ = tx.send(outcome);
        });

        PendingWrite { op, rx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Corpus, MemoryStore};

    struct SlowStore {
        inner: MemoryStore,
        delay: Duration,
    }

    impl EmbeddingStore for SlowStore {
        fn insert(&self, id: &str, text: &str) -> Result<()> {
            std::thread::sleep(self.delay);
            self.inner.insert(id, text)
        }
        fn update(&self, id: &str, text: &str) -> Result<()> {
            std::thread::sleep(self.delay);
            self.inner.update(id, text)
        }
        fn remove(&self, id: &str) -> Result<()> {
            self.inner.remove(id)
        }
        fn query_similar(&self, text: &str, k: usize) -> Result<Vec<(String, String)>> {
            self.inner.query_similar(text, k)
        }
        fn get_all(&self, limit: usize) -> Result<Corpus> {
            self.inner.get_all(limit)
        }
    }

    #[tokio::test]
    async fn insert_then_update_complete() {
        let store = Arc::new(MemoryStore::default());
        let writer = IndexWriter::new(Arc::clone(&store)).unwrap();

        let pending = writer.insert("a", "first text");
        assert_eq!(pending.op(), WriteOp::Insert);
        pending.wait().await.unwrap();
        writer.update("a", "second text").wait().await.unwrap();

        assert_eq!(store.text("a").unwrap().as_deref(), Some("second text"));
    }

    #[tokio::test]
    async fn store_errors_reach_the_handle() {
        let store = Arc::new(MemoryStore::default());
        let writer = IndexWriter::new(store).unwrap();
        let err = writer.update("missing", "x").wait().await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn slow_write_times_out_but_still_commits() {
        let store = Arc::new(SlowStore {
            inner: MemoryStore::default(),
            delay: Duration::from_millis(200),
        });
        let writer = IndexWriter::new(Arc::clone(&store))
            .unwrap()
            .with_timeout(Duration::from_millis(20));

        let err = writer.insert("slow", "text").wait().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.inner.text("slow").unwrap().as_deref(), Some("text"));
    }

    #[tokio::test]
    async fn dropped_handle_does_not_cancel_write() {
        let store = Arc::new(MemoryStore::default());
        let writer = IndexWriter::new(Arc::clone(&store)).unwrap();
        drop(writer.insert("x", "fire and forget"));
        writer.insert("y", "barrier").wait().await.unwrap();

        for _ in 0..50 {
            if store.text("x").unwrap().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.text("x").unwrap().is_some());
    }

    #[test]
    fn new_outside_runtime_fails() {
        let store = Arc::new(MemoryStore::default());
        assert!(IndexWriter::new(store).is_err());
    }
}
