use crate::syntax::NodeLocation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// FINDINGS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FindingKind {
    MissingFromDependencyList,
    /// Same paths as `MissingFromDependencyList`, kept for hosts that still
    /// match on the older diagnostic id.
    MissingFromDependencyListLegacy,
    MissingFromDeclaredShape,
    UnusedDependency,
}

impl FindingKind {
    pub fn message(&self, path: &str) -> String {
        match self {
            FindingKind::MissingFromDependencyList => {
                format!("'{path}' is used by the component but missing from the dependency list.")
            }
            FindingKind::MissingFromDependencyListLegacy => {
                format!("Missing dependency '{path}'.")
            }
            FindingKind::MissingFromDeclaredShape => {
                format!("'{path}' is used by the component but missing from its declared props.")
            }
            FindingKind::UnusedDependency => {
                format!("'{path}' is listed as a dependency but never used by the component.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub kind: FindingKind,
    pub path: String,
    pub message: String,
    pub location: NodeLocation,
}

impl Finding {
    pub fn new(kind: FindingKind, path: &str, location: NodeLocation) -> Self {
        Self {
            kind,
            path: path.to_string(),
            message: kind.message(path),
            location,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("dependency list must be an array literal")]
    DependencyListNotArray,

    #[error("dependency at index {index} is not a string literal")]
    NonLiteralDependency { index: usize, location: NodeLocation },

    #[error("unsupported component body of kind '{kind}'")]
    UnsupportedComponent { kind: String },

    #[error("invalid analysis input: {0}")]
    Json(#[from] serde_json::Error),
}
