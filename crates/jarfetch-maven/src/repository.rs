//! Remote URL layout for Maven-style repositories.
//!
//! All functions here are pure: given a repository base URL and a coordinate
//! they produce the URL the standard Maven 2 layout puts the document at.

use crate::coordinate::Coordinate;
use crate::metadata::{GroupMetadata, VersionMetadata};

/// Maven Central base URL.
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

/// Normalize a repository base URL by trimming trailing slashes.
pub fn normalize_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Base remote path for a coordinate, without extension:
/// `{repo}/{group/with/slashes}/{artifact}/{version}/{artifact}-{version}[-{classifier}]`.
pub fn remote_base(repo: &str, coord: &Coordinate) -> String {
    let stem = match &coord.classifier {
        Some(c) => format!("{}-{}-{}", coord.artifact_id, coord.version, c),
        None => format!("{}-{}", coord.artifact_id, coord.version),
    };
    format!("{}/{}/{}", repo, coord.repo_path(), stem)
}

/// Direct URL for an artifact file, bypassing metadata resolution.
pub fn direct_url(repo: &str, coord: &Coordinate, extension: &str) -> String {
    format!(
        "{}/{}/{}",
        repo,
        coord.repo_path(),
        coord.file_name(&coord.version, extension)
    )
}

/// URL of the `maven-metadata.xml` in the artifact directory
/// (version listing).
pub fn group_metadata_url(repo: &str, coord: &Coordinate) -> String {
    format!(
        "{}/{}/{}/maven-metadata.xml",
        repo,
        coord.group_path(),
        coord.artifact_id
    )
}

/// URL of the `maven-metadata.xml` in the version directory, used for
/// timestamped SNAPSHOT resolution. The version segment is resolved through
/// the group-level metadata.
pub fn version_metadata_url(repo: &str, group_meta: &GroupMetadata, coord: &Coordinate) -> String {
    format!(
        "{}/{}/{}/{}/maven-metadata.xml",
        repo,
        coord.group_path(),
        coord.artifact_id,
        group_meta.resolve_version(&coord.version)
    )
}

/// URL of an artifact file, resolved through version-level metadata.
///
/// For snapshots the timestamped snapshot version from the metadata replaces
/// the `-SNAPSHOT` suffix in the file name; the directory keeps the
/// `-SNAPSHOT` form. For non-snapshots this is equivalent to [`direct_url`].
pub fn artifact_url(
    repo: &str,
    version_meta: &VersionMetadata,
    coord: &Coordinate,
    extension: &str,
) -> String {
    if coord.is_snapshot() {
        if let Some(timestamped) = version_meta.timestamped_version() {
            return format!(
                "{}/{}/{}",
                repo,
                coord.repo_path(),
                coord.file_name(&timestamped, extension)
            );
        }
        tracing::debug!(
            "no timestamped snapshot version in metadata for {coord}, using literal version"
        );
    }
    direct_url(repo, coord, extension)
}
