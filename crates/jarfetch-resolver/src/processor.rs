//! Transitive-dependency processors: a visitor chain over each declared
//! dependency before it becomes a child task.

use jarfetch_maven::coordinate::Coordinate;
use jarfetch_maven::descriptor::DeclaredDep;

/// Mutable view of one declared dependency as it moves through the
/// processor chain.
///
/// `group_id` and `version` may still carry the literal `${project.*}`
/// tokens at this point; substitution happens after the chain runs.
#[derive(Debug, Clone)]
pub struct TransitiveCandidate {
    /// When left `false` by the chain, the dependency is skipped.
    pub allowed: bool,
    pub group_id: String,
    pub artifact_id: String,
    /// Empty when the descriptor declared no version.
    pub version: String,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
}

impl TransitiveCandidate {
    pub fn from_declared(declared: &DeclaredDep) -> Self {
        Self {
            allowed: true,
            group_id: declared.group_id.clone(),
            artifact_id: declared.artifact_id.clone(),
            version: declared.version.clone().unwrap_or_default(),
            classifier: declared.classifier.clone(),
            scope: declared.scope.clone(),
            optional: declared.optional,
        }
    }
}

/// A hook over transitive candidates, applied in registration order.
///
/// Processors may rewrite any field (pin a version, add a classifier) or
/// clear `allowed` to drop the dependency. Extension is by trait object, so
/// callers compose behaviors without inheritance.
pub trait TransitiveProcessor: Send + Sync {
    fn process(&self, parent: &Coordinate, candidate: &mut TransitiveCandidate);
}

impl<F> TransitiveProcessor for F
where
    F: Fn(&Coordinate, &mut TransitiveCandidate) + Send + Sync,
{
    fn process(&self, parent: &Coordinate, candidate: &mut TransitiveCandidate) {
        self(parent, candidate)
    }
}
