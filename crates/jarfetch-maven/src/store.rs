//! Local artifact store mirroring the Maven repository layout.

use std::fs;
use std::path::{Path, PathBuf};

use crate::coordinate::Coordinate;
use crate::descriptor::{self, Descriptor};

/// The on-disk tree artifacts are installed into.
///
/// Layout mirrors the remote repository:
/// `{root}/{group/with/slashes}/{artifact}/{version}/{artifact}-{version}[-{classifier}].{ext}`.
/// Snapshot coordinates keep the `-SNAPSHOT` version on disk even when the
/// remote file name was timestamped.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for one artifact file under the store root. Pure: no filesystem
    /// access.
    pub fn artifact_path(&self, coord: &Coordinate, extension: &str) -> PathBuf {
        self.root
            .join(coord.group_path())
            .join(&coord.artifact_id)
            .join(&coord.version)
            .join(coord.file_name(&coord.version, extension))
    }

    /// Path of the binary artifact for a coordinate.
    pub fn jar_path(&self, coord: &Coordinate) -> PathBuf {
        self.artifact_path(coord, "jar")
    }

    /// Path of the descriptor for a coordinate.
    pub fn descriptor_path(&self, coord: &Coordinate) -> PathBuf {
        self.artifact_path(coord, "pom")
    }

    /// Install bytes at `path` atomically (write-temp-then-rename).
    pub fn install(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        jarfetch_util::fs::write_replace(path, bytes)
    }

    /// Read and parse the cached descriptor for a coordinate.
    ///
    /// `None` when the file is absent or unparseable; a broken cached
    /// descriptor is logged and treated like a missing one.
    pub fn cached_descriptor(&self, coord: &Coordinate) -> Option<Descriptor> {
        let path = self.descriptor_path(coord);
        if !path.is_file() {
            return None;
        }
        let content = fs::read_to_string(&path).ok()?;
        match descriptor::parse_descriptor(&content) {
            Ok(desc) => Some(desc),
            Err(e) => {
                tracing::warn!("unreadable cached descriptor at {}: {e}", path.display());
                None
            }
        }
    }
}
