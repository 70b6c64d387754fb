//! Artifact coordinates and download requests.

use crate::checksum::Algo;

/// Maven coordinates identifying one artifact.
///
/// Identity is the full `(group, artifact, version, classifier)` tuple.
/// The version is an opaque string; a version ending in `-SNAPSHOT` requires
/// metadata-driven resolution to the timestamped filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl Coordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Parse `"group:artifact:version"` or `"group:artifact:version:classifier"`.
    ///
    /// Returns `None` when the shape is wrong or any mandatory part is empty.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let (group, artifact, version, classifier) = match parts.as_slice() {
            [g, a, v] => (*g, *a, *v, None),
            [g, a, v, c] => (*g, *a, *v, Some(*c)),
            _ => return None,
        };
        if group.is_empty() || artifact.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self {
            group_id: group.to_string(),
            artifact_id: artifact.to_string(),
            version: version.to_string(),
            classifier: classifier
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string()),
        })
    }

    /// Whether this version requires snapshot metadata resolution.
    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with("-SNAPSHOT")
    }

    /// Group ID with dots replaced by slashes: `org.example` -> `org/example`.
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// Standard layout path for this coordinate:
    /// `org/example/my-lib/1.0`.
    pub fn repo_path(&self) -> String {
        format!("{}/{}/{}", self.group_path(), self.artifact_id, self.version)
    }

    /// File name for this coordinate under the standard layout:
    /// `my-lib-1.0[-classifier].ext`. The version is overridable so that
    /// snapshot coordinates can substitute the timestamped version while the
    /// directory keeps the `-SNAPSHOT` form.
    pub fn file_name(&self, version: &str, extension: &str) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}-{}.{}", self.artifact_id, version, c, extension),
            None => format!("{}-{}.{}", self.artifact_id, version, extension),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id, self.artifact_id, self.version
        )?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

/// A download request: a coordinate plus how to treat it.
///
/// Roots are built by the caller; transitive children are synthesized during
/// descriptor expansion. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Dependency {
    pub coordinate: Coordinate,
    /// Whether to fetch the descriptor and expand declared dependencies.
    pub transitive: bool,
    /// Pinned checksums. When non-empty, every entry must match the
    /// downloaded bytes and remote sidecar files are not consulted.
    pub checksums: Vec<(Algo, String)>,
}

impl Dependency {
    pub fn new(coordinate: Coordinate, transitive: bool) -> Self {
        Self {
            coordinate,
            transitive,
            checksums: Vec::new(),
        }
    }

    /// A transitive child synthesized from a descriptor: always expandable,
    /// never checksum-pinned.
    pub fn child(coordinate: Coordinate) -> Self {
        Self::new(coordinate, true)
    }

    pub fn with_checksum(mut self, algo: Algo, hex: impl Into<String>) -> Self {
        self.checksums.push((algo, hex.into()));
        self
    }
}
