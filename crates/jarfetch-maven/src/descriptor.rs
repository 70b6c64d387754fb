//! POM descriptor parsing: declared dependencies and declared repositories.
//!
//! Only the elements the downloader consumes are modelled: project
//! coordinates, `repositories/repository/url`, and
//! `dependencies/dependency/{groupId,artifactId,version,classifier,scope,optional}`.
//! Everything else in the document is ignored.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::coordinate::Coordinate;
use crate::error::ParseError;

/// A parsed project descriptor (`pom.xml`).
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    /// Base URLs of additional repositories declared by the project.
    pub repositories: Vec<String>,
    pub dependencies: Vec<DeclaredDep>,
}

/// A dependency declared in a descriptor.
///
/// `group_id` and `version` may carry the literal `${project.groupId}` /
/// `${project.version}` tokens; substitution against the parent coordinate
/// happens during transitive expansion, not here.
#[derive(Debug, Clone)]
pub struct DeclaredDep {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
}

impl DeclaredDep {
    fn empty() -> Self {
        Self {
            group_id: String::new(),
            artifact_id: String::new(),
            version: None,
            classifier: None,
            scope: None,
            optional: false,
        }
    }
}

/// Scopes the downloader follows transitively. An absent scope counts as
/// `compile`; `test`, `provided`, `system` and `import` are dropped.
pub fn is_relevant_scope(scope: Option<&str>) -> bool {
    matches!(scope.unwrap_or("compile"), "" | "compile" | "runtime")
}

/// Substitute the two project tokens a descriptor may use in place of a
/// literal group or version, against the immediate parent coordinate.
///
/// Only `${project.groupId}` and `${project.version}` are handled; general
/// property interpolation is out of scope.
pub fn substitute_project_refs(value: &str, parent: &Coordinate) -> String {
    value
        .replace("${project.groupId}", &parent.group_id)
        .replace("${project.version}", &parent.version)
}

/// Parse a descriptor document.
pub fn parse_descriptor(xml: &str) -> Result<Descriptor, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut descriptor = Descriptor::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();
    let mut current_dep: Option<DeclaredDep> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag);
                text_buf.clear();

                if path.join(">") == "project>dependencies>dependency" {
                    current_dep = Some(DeclaredDep::empty());
                }
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path.join(">");

                // Top-level project coordinates
                if path.len() == 2 {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") => descriptor.group_id = Some(text_buf.clone()),
                        Some("artifactId") => descriptor.artifact_id = Some(text_buf.clone()),
                        Some("version") => descriptor.version = Some(text_buf.clone()),
                        _ => {}
                    }
                }

                if ctx == "project>repositories>repository>url" {
                    descriptor.repositories.push(text_buf.clone());
                }

                if let Some(ref mut dep) = current_dep {
                    match ctx.as_str() {
                        "project>dependencies>dependency>groupId" => {
                            dep.group_id = text_buf.clone();
                        }
                        "project>dependencies>dependency>artifactId" => {
                            dep.artifact_id = text_buf.clone();
                        }
                        "project>dependencies>dependency>version" => {
                            dep.version = Some(text_buf.clone());
                        }
                        "project>dependencies>dependency>classifier" => {
                            dep.classifier = Some(text_buf.clone());
                        }
                        "project>dependencies>dependency>scope" => {
                            dep.scope = Some(text_buf.clone());
                        }
                        "project>dependencies>dependency>optional" => {
                            dep.optional = text_buf.trim() == "true";
                        }
                        _ => {}
                    }
                }
                if ctx == "project>dependencies>dependency" {
                    if let Some(dep) = current_dep.take() {
                        descriptor.dependencies.push(dep);
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::new(format!("failed to parse POM XML: {e}")));
            }
            _ => {}
        }
    }

    Ok(descriptor)
}
