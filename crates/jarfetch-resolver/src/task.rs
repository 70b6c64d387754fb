//! The dependency task: resolve one coordinate across the repository set,
//! install its artifact and descriptor, expand transitive children, and
//! aggregate their outcomes.

use std::path::Path;
use std::sync::Arc;

use futures::FutureExt;
use jarfetch_maven::checksum::{self, RemoteVerification};
use jarfetch_maven::coordinate::{Coordinate, Dependency};
use jarfetch_maven::descriptor::{self, Descriptor};
use jarfetch_maven::fetch;
use jarfetch_maven::repository;
use jarfetch_maven::store::LocalStore;
use jarfetch_maven::transport::Transport;
use tokio::sync::Semaphore;

use crate::outcome::{DownloadError, DownloadResult};
use crate::processor::{TransitiveCandidate, TransitiveProcessor};
use crate::shared::{RepositorySet, TaskFuture, TaskRegistry};

/// State shared by every task of one resolve run.
pub(crate) struct ResolveContext {
    pub transport: Arc<dyn Transport>,
    pub store: LocalStore,
    pub repos: RepositorySet,
    pub registry: TaskRegistry,
    pub processors: Vec<Arc<dyn TransitiveProcessor>>,
    /// Bounds the number of tasks in their network/verify/install phase.
    /// Held only through those phases and released before child joins, so
    /// recursive submission cannot starve the run.
    pub limiter: Arc<Semaphore>,
}

/// One unit of work: download a single dependency and its subtree.
///
/// Created once per (coordinate, parent) pair, never reused. `run` encodes
/// every failure into the returned [`DownloadResult`]; nothing unwinds out.
pub(crate) struct DependencyTask {
    dependency: Dependency,
    optional: bool,
    ctx: Arc<ResolveContext>,
}

impl DependencyTask {
    pub(crate) fn new(dependency: Dependency, optional: bool, ctx: Arc<ResolveContext>) -> Self {
        Self {
            dependency,
            optional,
            ctx,
        }
    }

    /// Submit the task to the runtime, returning a future both the parent
    /// and the global registry can await. A cancelled or panicked task
    /// surfaces as a failed result rather than an unwind.
    pub(crate) fn spawn(self) -> TaskFuture {
        let dependency = self.dependency.clone();
        let optional = self.optional;
        let jar_path = self.ctx.store.jar_path(&dependency.coordinate);

        let handle = tokio::spawn(self.run());
        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    let message = if e.is_cancelled() {
                        "cancelled by the runtime".to_string()
                    } else {
                        format!("{e}")
                    };
                    DownloadResult::failure(
                        dependency,
                        jar_path,
                        optional,
                        DownloadError::Aborted { message },
                    )
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn run(self) -> DownloadResult {
        let coord = self.dependency.coordinate.clone();
        let jar_path = self.ctx.store.jar_path(&coord);

        // Cache short-circuit: an installed artifact is never re-fetched.
        // A transitive dependency with a cached descriptor still expands its
        // children so the subtree stays complete.
        if jar_path.is_file() {
            tracing::debug!("cache hit for {coord}");
            let children = if self.dependency.transitive {
                match self.ctx.store.cached_descriptor(&coord) {
                    Some(desc) => self.expand(&desc),
                    None => Vec::new(),
                }
            } else {
                Vec::new()
            };
            let transitive = self.join_children(children).await;
            return DownloadResult::success(self.dependency, jar_path, self.optional, transitive);
        }

        let children = {
            let _permit = self.ctx.limiter.clone().acquire_owned().await;
            match self.resolve_remote(&coord, &jar_path).await {
                Ok(children) => children,
                Err(error) => {
                    tracing::debug!("{coord} failed: {error}");
                    return DownloadResult::failure(
                        self.dependency,
                        jar_path,
                        self.optional,
                        error,
                    );
                }
            }
        };

        let transitive = self.join_children(children).await;
        DownloadResult::success(self.dependency, jar_path, self.optional, transitive)
    }

    /// The per-repository loop: direct probe for release versions, then
    /// metadata-driven resolution. Returns the spawned child futures of the
    /// winning repository.
    async fn resolve_remote(
        &self,
        coord: &Coordinate,
        jar_path: &Path,
    ) -> Result<Vec<TaskFuture>, DownloadError> {
        let transport = self.ctx.transport.as_ref();

        for repo in self.ctx.repos.snapshot() {
            // Direct probe: snapshots always need metadata, releases usually
            // sit at the literal URL.
            if !coord.is_snapshot() {
                let pom_url = repository::direct_url(&repo, coord, "pom");
                let jar_url = repository::direct_url(&repo, coord, "jar");
                match self.download(&repo, &pom_url, &jar_url, jar_path).await {
                    Ok(children) => return Ok(children),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) if e.is_connectivity() => {
                        tracing::warn!("{repo} unreachable for {coord}: {e}");
                        continue;
                    }
                    Err(e) => {
                        tracing::debug!("direct probe missed at {repo} ({e}), trying metadata");
                    }
                }
            }

            let group_url = repository::group_metadata_url(&repo, coord);
            let group_meta = match fetch::get_group_metadata(transport, &group_url).await {
                Ok(Some(meta)) => meta,
                Ok(None) => {
                    tracing::debug!("no group metadata at {group_url}");
                    continue;
                }
                Err(e) if e.is_connectivity() => {
                    tracing::warn!("{repo} unreachable for {coord}: {e}");
                    continue;
                }
                Err(e) => {
                    tracing::warn!("skipping {repo} for {coord}: {e}");
                    continue;
                }
            };

            let version_url = repository::version_metadata_url(&repo, &group_meta, coord);
            let version_meta = match fetch::get_version_metadata(transport, &version_url).await {
                Ok(Some(meta)) => meta,
                Ok(None) => {
                    tracing::debug!("no version metadata at {version_url}");
                    continue;
                }
                Err(e) if e.is_connectivity() => {
                    tracing::warn!("{repo} unreachable for {coord}: {e}");
                    continue;
                }
                Err(e) => {
                    tracing::warn!("skipping {repo} for {coord}: {e}");
                    continue;
                }
            };

            // This repository produced a coherent artifact URL; its download
            // outcome is final, success or not.
            let pom_url = repository::artifact_url(&repo, &version_meta, coord, "pom");
            let jar_url = repository::artifact_url(&repo, &version_meta, coord, "jar");
            return self.download(&repo, &pom_url, &jar_url, jar_path).await;
        }

        Err(DownloadError::Exhausted {
            coordinate: coord.to_string(),
        })
    }

    /// Download one artifact from one repository: descriptor first (when the
    /// dependency is transitive), then the binary, checksum verification,
    /// and atomic installation.
    async fn download(
        &self,
        repo: &str,
        pom_url: &str,
        jar_url: &str,
        jar_path: &Path,
    ) -> Result<Vec<TaskFuture>, DownloadError> {
        let coord = &self.dependency.coordinate;
        let transport = self.ctx.transport.as_ref();

        let mut children = Vec::new();
        if self.dependency.transitive {
            match fetch::get_descriptor(transport, pom_url).await {
                Ok(Some(fetched)) => {
                    let pom_path = self.ctx.store.descriptor_path(coord);
                    self.ctx
                        .store
                        .install(&pom_path, &fetched.raw)
                        .map_err(|e| DownloadError::Install {
                            path: pom_path.display().to_string(),
                            message: e.to_string(),
                        })?;
                    children = self.expand(&fetched.descriptor);
                }
                // An artifact without a descriptor downloads without children.
                Ok(None) => tracing::debug!("no descriptor at {pom_url}"),
                Err(e) if e.is_connectivity() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("skipping transitive expansion for {coord}: {e}");
                }
            }
        }

        let bytes = match transport.get(jar_url).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                return Err(DownloadError::NotFound {
                    url: jar_url.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        self.verify(jar_url, &bytes).await?;

        self.ctx
            .store
            .install(jar_path, &bytes)
            .map_err(|e| DownloadError::Install {
                path: jar_path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::info!("installed {coord} from {repo}");
        Ok(children)
    }

    /// Checksum pipeline: pinned digests all must match; otherwise remote
    /// sidecars decide, and an artifact without any published sidecar is
    /// accepted unverified.
    async fn verify(&self, jar_url: &str, bytes: &[u8]) -> Result<(), DownloadError> {
        let coord = &self.dependency.coordinate;

        if !self.dependency.checksums.is_empty() {
            checksum::verify_declared(&self.dependency.checksums, bytes)
                .map_err(DownloadError::from)?;
            tracing::debug!("{coord} verified against pinned checksums");
            return Ok(());
        }

        match checksum::verify_remote(self.ctx.transport.as_ref(), jar_url, bytes).await {
            Ok(RemoteVerification::Verified(algo)) => {
                tracing::debug!("{coord} verified via {algo} sidecar");
                Ok(())
            }
            Ok(RemoteVerification::Unverified) => {
                tracing::debug!("no checksum sidecar for {jar_url}; accepting unverified");
                Ok(())
            }
            Ok(RemoteVerification::Failed(mismatch)) => Err(mismatch.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Expand a descriptor into child tasks.
    ///
    /// Declared repositories join the shared set first so the children (and
    /// every other in-flight task) can probe them. Each declared dependency
    /// runs through the processor chain, the scope filter, and project-token
    /// substitution before becoming a task.
    fn expand(&self, desc: &Descriptor) -> Vec<TaskFuture> {
        let parent = &self.dependency.coordinate;

        for url in &desc.repositories {
            self.ctx.repos.insert(url);
        }

        let mut children = Vec::new();
        for declared in &desc.dependencies {
            let mut candidate = TransitiveCandidate::from_declared(declared);
            for processor in &self.ctx.processors {
                processor.process(parent, &mut candidate);
            }
            if !candidate.allowed {
                tracing::debug!(
                    "processor chain dropped {}:{}",
                    candidate.group_id,
                    candidate.artifact_id
                );
                continue;
            }
            if !descriptor::is_relevant_scope(candidate.scope.as_deref()) {
                continue;
            }

            let group = descriptor::substitute_project_refs(&candidate.group_id, parent);
            let version = descriptor::substitute_project_refs(&candidate.version, parent);
            if group.is_empty() || candidate.artifact_id.is_empty() || version.is_empty() {
                tracing::warn!(
                    "skipping incomplete dependency {:?}:{:?} declared by {parent}",
                    group,
                    candidate.artifact_id
                );
                continue;
            }

            let mut coordinate = Coordinate::new(group, candidate.artifact_id.clone(), version);
            if let Some(classifier) = candidate.classifier.clone() {
                coordinate = coordinate.with_classifier(classifier);
            }

            let task = DependencyTask::new(
                Dependency::child(coordinate),
                candidate.optional,
                self.ctx.clone(),
            );
            let future = task.spawn();
            self.ctx.registry.register(future.clone());
            children.push(future);
        }
        children
    }

    /// Join children in submission order and aggregate their outcomes.
    ///
    /// Failed optional children are dropped silently; failed required
    /// children stay visible in the list without failing this task.
    async fn join_children(&self, children: Vec<TaskFuture>) -> Vec<DownloadResult> {
        let mut results = Vec::with_capacity(children.len());
        for future in children {
            let result = future.await;
            if !result.is_success() && result.optional {
                tracing::debug!(
                    "dropping failed optional dependency {}",
                    result.dependency.coordinate
                );
                continue;
            }
            results.push(result);
        }
        results
    }
}
