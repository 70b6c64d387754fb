//! The root driver: seeds shared state, fans out one task per root, joins
//! them in input order, and drains every in-flight child before returning.

use std::path::PathBuf;
use std::sync::Arc;

use jarfetch_maven::coordinate::Dependency;
use jarfetch_maven::store::LocalStore;
use jarfetch_maven::transport::Transport;
use tokio::sync::Semaphore;

use crate::outcome::DownloadResult;
use crate::processor::TransitiveProcessor;
use crate::shared::{RepositorySet, TaskRegistry};
use crate::task::{DependencyTask, ResolveContext};

/// Default bound on tasks concurrently downloading/verifying/installing.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// The resolver: configuration that outlives individual resolve runs.
///
/// Each [`Resolver::resolve`] call gets its own repository set, task
/// registry, and concurrency limiter; the transport, download root, and
/// processor chain are shared across runs.
pub struct Resolver {
    transport: Arc<dyn Transport>,
    download_root: PathBuf,
    processors: Vec<Arc<dyn TransitiveProcessor>>,
    concurrency: usize,
}

impl Resolver {
    pub fn new(transport: Arc<dyn Transport>, download_root: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            download_root: download_root.into(),
            processors: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Bound on concurrently downloading tasks; clamped to at least 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Append a transitive-dependency processor; the chain runs in
    /// registration order over every declared dependency.
    pub fn with_processor(mut self, processor: Arc<dyn TransitiveProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Resolve every root against the candidate repositories.
    ///
    /// Returns one result per root, in input order, with transitive results
    /// nested under each. Malformed repository URLs are logged and skipped.
    /// No in-flight child task survives the return: the registry is drained
    /// after the roots complete.
    pub async fn resolve(
        &self,
        roots: Vec<Dependency>,
        repositories: &[String],
    ) -> Vec<DownloadResult> {
        let repos = RepositorySet::new();
        for url in repositories {
            repos.insert(url);
        }
        if repos.is_empty() {
            tracing::warn!("no usable repositories configured");
        }

        let ctx = Arc::new(ResolveContext {
            transport: self.transport.clone(),
            store: LocalStore::new(&self.download_root),
            repos,
            registry: TaskRegistry::new(),
            processors: self.processors.clone(),
            limiter: Arc::new(Semaphore::new(self.concurrency)),
        });

        let root_futures: Vec<_> = roots
            .into_iter()
            .map(|dependency| DependencyTask::new(dependency, false, ctx.clone()).spawn())
            .collect();

        let mut results = Vec::with_capacity(root_futures.len());
        for future in root_futures {
            results.push(future.await);
        }

        let drained = ctx.registry.drain().await;
        if drained > 0 {
            tracing::debug!("drained {drained} child task futures");
        }

        results
    }
}
