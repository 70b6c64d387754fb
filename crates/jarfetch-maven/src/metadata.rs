//! `maven-metadata.xml` parsing for version discovery and SNAPSHOT resolution.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ParseError;

/// Metadata from the artifact directory, listing published versions.
#[derive(Debug, Clone, Default)]
pub struct GroupMetadata {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub latest: Option<String>,
    pub release: Option<String>,
    pub versions: Vec<String>,
}

impl GroupMetadata {
    /// Resolve a requested version through this listing.
    ///
    /// The listed entry matching the request is used when present; an
    /// unlisted request falls back to the literal version so a pinned
    /// coordinate is never redirected.
    pub fn resolve_version<'a>(&'a self, requested: &'a str) -> &'a str {
        if self.versions.iter().any(|v| v == requested) {
            return requested;
        }
        tracing::debug!("version {requested} not listed in group metadata");
        requested
    }
}

/// Metadata from the version directory, carrying the timestamped snapshot
/// build for `-SNAPSHOT` versions.
#[derive(Debug, Clone, Default)]
pub struct VersionMetadata {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub timestamp: Option<String>,
    pub build_number: Option<u32>,
    pub last_updated: Option<String>,
}

impl VersionMetadata {
    /// The timestamped snapshot version string.
    ///
    /// For version `1.0-SNAPSHOT` with timestamp `20240101.120000` and build
    /// number `3`, returns `1.0-20240101.120000-3`. `None` when the metadata
    /// does not describe a snapshot build.
    pub fn timestamped_version(&self) -> Option<String> {
        let version = self.version.as_deref()?;
        let base = version.strip_suffix("-SNAPSHOT")?;
        let ts = self.timestamp.as_deref()?;
        let bn = self.build_number?;
        Some(format!("{base}-{ts}-{bn}"))
    }
}

/// Parse the artifact-directory `maven-metadata.xml`.
pub fn parse_group_metadata(xml: &str) -> Result<GroupMetadata, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut meta = GroupMetadata::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text_buf.clear();
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path.join(">");

                match ctx.as_str() {
                    "metadata>groupId" => meta.group_id = Some(text_buf.clone()),
                    "metadata>artifactId" => meta.artifact_id = Some(text_buf.clone()),
                    "metadata>versioning>latest" => meta.latest = Some(text_buf.clone()),
                    "metadata>versioning>release" => meta.release = Some(text_buf.clone()),
                    "metadata>versioning>versions>version" => {
                        meta.versions.push(text_buf.clone());
                    }
                    _ => {}
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::new(format!(
                    "failed to parse maven-metadata.xml: {e}"
                )));
            }
            _ => {}
        }
    }

    Ok(meta)
}

/// Parse the version-directory `maven-metadata.xml`.
pub fn parse_version_metadata(xml: &str) -> Result<VersionMetadata, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut meta = VersionMetadata::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text_buf.clear();
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path.join(">");

                match ctx.as_str() {
                    "metadata>groupId" => meta.group_id = Some(text_buf.clone()),
                    "metadata>artifactId" => meta.artifact_id = Some(text_buf.clone()),
                    "metadata>version" => meta.version = Some(text_buf.clone()),
                    "metadata>versioning>snapshot>timestamp" => {
                        meta.timestamp = Some(text_buf.clone());
                    }
                    "metadata>versioning>snapshot>buildNumber" => {
                        meta.build_number = text_buf.parse().ok();
                    }
                    "metadata>versioning>lastUpdated" => {
                        meta.last_updated = Some(text_buf.clone());
                    }
                    _ => {}
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::new(format!(
                    "failed to parse snapshot metadata: {e}"
                )));
            }
            _ => {}
        }
    }

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_group_listing() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>org.example</groupId>
  <artifactId>my-lib</artifactId>
  <versioning>
    <latest>2.0</latest>
    <release>2.0</release>
    <versions>
      <version>1.0</version>
      <version>1.5</version>
      <version>2.0</version>
    </versions>
    <lastUpdated>20240101120000</lastUpdated>
  </versioning>
</metadata>"#;
        let meta = parse_group_metadata(xml).unwrap();
        assert_eq!(meta.group_id.as_deref(), Some("org.example"));
        assert_eq!(meta.artifact_id.as_deref(), Some("my-lib"));
        assert_eq!(meta.latest.as_deref(), Some("2.0"));
        assert_eq!(meta.versions, vec!["1.0", "1.5", "2.0"]);
    }

    #[test]
    fn resolve_version_prefers_listed_entry() {
        let meta = GroupMetadata {
            versions: vec!["1.0".into(), "2.0".into()],
            ..Default::default()
        };
        assert_eq!(meta.resolve_version("1.0"), "1.0");
    }

    #[test]
    fn resolve_version_keeps_unlisted_request() {
        let meta = GroupMetadata {
            versions: vec!["1.0".into()],
            latest: Some("1.0".into()),
            ..Default::default()
        };
        assert_eq!(meta.resolve_version("3.0"), "3.0");
    }

    #[test]
    fn parse_version_snapshot_build() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>com.example</groupId>
  <artifactId>my-lib</artifactId>
  <version>1.0-SNAPSHOT</version>
  <versioning>
    <snapshot>
      <timestamp>20240615.143022</timestamp>
      <buildNumber>42</buildNumber>
    </snapshot>
    <lastUpdated>20240615143022</lastUpdated>
  </versioning>
</metadata>"#;
        let meta = parse_version_metadata(xml).unwrap();
        assert_eq!(meta.timestamp.as_deref(), Some("20240615.143022"));
        assert_eq!(meta.build_number, Some(42));
        assert_eq!(
            meta.timestamped_version().unwrap(),
            "1.0-20240615.143022-42"
        );
    }

    #[test]
    fn timestamped_version_none_for_release() {
        let meta = VersionMetadata {
            version: Some("1.0.0".to_string()),
            timestamp: Some("20240101.000000".to_string()),
            build_number: Some(1),
            ..Default::default()
        };
        assert!(meta.timestamped_version().is_none());
    }

    #[test]
    fn mismatched_close_tag_is_a_parse_error() {
        assert!(parse_group_metadata("<metadata></versioning></metadata>").is_err());
        assert!(parse_version_metadata("<metadata></versioning></metadata>").is_err());
    }
}
