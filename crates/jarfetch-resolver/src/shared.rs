//! State shared by every task of one resolve run: the growing repository
//! set and the registry of in-flight task futures.

use std::sync::Mutex;

use futures::future::{BoxFuture, Shared};
use url::Url;

use crate::outcome::DownloadResult;

/// A task's future, shareable between its parent and the global registry.
pub type TaskFuture = Shared<BoxFuture<'static, DownloadResult>>;

/// The monotonically growing set of candidate repository base URLs.
///
/// Seeded from caller configuration, extended whenever a descriptor declares
/// additional repositories. Iteration order is insertion order, which keeps
/// the per-repository probe loop deterministic. Never pruned during a run.
#[derive(Debug, Default)]
pub struct RepositorySet {
    inner: Mutex<Vec<String>>,
}

impl RepositorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, normalize, and insert a base URL.
    ///
    /// Duplicates are no-ops. Malformed URLs are logged and skipped; they
    /// never abort a resolve. Returns whether the set grew.
    pub fn insert(&self, raw: &str) -> bool {
        if let Err(e) = Url::parse(raw) {
            tracing::warn!("skipping malformed repository URL {raw:?}: {e}");
            return false;
        }
        let normalized = jarfetch_maven::repository::normalize_base(raw);
        let mut inner = self.inner.lock().expect("repository set lock poisoned");
        if inner.iter().any(|existing| *existing == normalized) {
            return false;
        }
        tracing::debug!("repository added: {normalized}");
        inner.push(normalized);
        true
    }

    /// A point-in-time copy for iteration. Tasks loop over a snapshot so a
    /// concurrent insert cannot shift their probe order mid-flight.
    pub fn snapshot(&self) -> Vec<String> {
        self.inner.lock().expect("repository set lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("repository set lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append-only collection of every spawned child future.
///
/// Parents join their own children, but a parent that fails early may drop
/// its local list; draining the registry at the end of the run guarantees no
/// in-flight task survives the root call's return.
#[derive(Default)]
pub struct TaskRegistry {
    inner: Mutex<Vec<TaskFuture>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, future: TaskFuture) {
        self.inner
            .lock()
            .expect("task registry lock poisoned")
            .push(future);
    }

    /// Await every registered future until none remain.
    ///
    /// Awaiting a batch can register more futures, so the drain loops until
    /// a taken batch comes back empty. Returns the number of futures awaited.
    pub async fn drain(&self) -> usize {
        let mut drained = 0;
        loop {
            let batch: Vec<TaskFuture> = {
                let mut inner = self.inner.lock().expect("task registry lock poisoned");
                inner.drain(..).collect()
            };
            if batch.is_empty() {
                return drained;
            }
            for future in batch {
                future.await;
                drained += 1;
            }
        }
    }
}
