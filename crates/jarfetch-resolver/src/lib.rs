//! Concurrent resolver/downloader engine for Maven-style repositories.
//!
//! Given root dependencies and candidate repository base URLs, the engine
//! locates each artifact, downloads and verifies it, expands transitive
//! dependencies declared in descriptors (including repositories those
//! descriptors add), and installs everything into a local tree mirroring the
//! repository layout. Every task reports a structured [`DownloadResult`];
//! no failure unwinds across a task boundary.

pub mod outcome;
pub mod processor;
pub mod resolver;
pub mod shared;

mod task;

pub use outcome::{DownloadError, DownloadResult};
pub use processor::{TransitiveCandidate, TransitiveProcessor};
pub use resolver::Resolver;
pub use shared::{RepositorySet, TaskRegistry};
