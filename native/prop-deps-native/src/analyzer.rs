//! Analyzer: per-component orchestration and batch entry points.

use crate::collect::collect_usage;
use crate::differ::diff;
use crate::finding::{AnalysisError, Finding};
use crate::registration::ComponentRegistration;
use crate::shape::ShapeTree;
use crate::shape_resolver::{discover_inline_shape, DeclarationContext, ShapeResolver};
use crate::syntax::Node;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAnalysis {
    pub name: Option<String>,
    /// Canonical paths in first-read order.
    pub used_paths: Vec<String>,
    pub findings: Vec<Finding>,
}

/// Per-component entry of a batch result.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Analyzed(ComponentAnalysis),
    Failed { name: Option<String>, error: String },
}

pub fn analyze_component(
    registration: &ComponentRegistration,
) -> Result<ComponentAnalysis, AnalysisError> {
    let name = registration.name.as_deref().unwrap_or("<anonymous>");
    let dependencies = registration.dependency_list()?;
    let body = Node::new(&registration.body).ok_or_else(|| AnalysisError::UnsupportedComponent {
        kind: "non-node".to_string(),
    })?;

    let context = DeclarationContext::from_roots(
        registration.declarations.iter().filter_map(Node::new),
    );
    debug!(component = name, declarations = context.len(), "analyzing component");

    let declared = registration
        .declared_shape
        .as_ref()
        .and_then(Node::new)
        .or_else(|| discover_inline_shape(body))
        .or_else(|| {
            let owner = registration.name.as_deref()?;
            context.get(&format!("{owner}.propTypes")).first().copied()
        });

    let resolver = ShapeResolver::new(context, &registration.options);
    let root = declared.map(|declaration| {
        debug!(component = name, ?declaration, "declared shape resolved");
        resolver.resolve_declared(declaration)
    });
    let root = match registration.name.as_deref() {
        Some(owner) => resolver.with_assigned_members(owner, root),
        None => root,
    };
    let shape = match root {
        Some(root) => ShapeTree::new(resolver, root, true),
        None => ShapeTree::undeclared(resolver),
    };

    let report = collect_usage(body, &shape)?;
    let findings = diff(&report, &shape, dependencies.as_deref(), &registration.options);
    debug!(
        component = name,
        used = report.used.len(),
        findings = findings.len(),
        "component analyzed"
    );

    Ok(ComponentAnalysis {
        name: registration.name.clone(),
        used_paths: report.used.keys().cloned().collect(),
        findings,
    })
}

/// Analyzes every registration in parallel. One malformed component never
/// aborts the batch.
pub fn analyze_components(
    registrations: &[ComponentRegistration],
) -> Vec<Result<ComponentAnalysis, AnalysisError>> {
    registrations.par_iter().map(analyze_component).collect()
}

/// JSON array of registrations in, JSON array of outcomes out.
pub fn analyze_json(input: &str) -> Result<String, AnalysisError> {
    let registrations: Vec<ComponentRegistration> = serde_json::from_str(input)?;
    let outcomes: Vec<AnalysisOutcome> = analyze_components(&registrations)
        .into_iter()
        .zip(&registrations)
        .map(|(result, registration)| match result {
            Ok(analysis) => AnalysisOutcome::Analyzed(analysis),
            Err(error) => AnalysisOutcome::Failed {
                name: registration.name.clone(),
                error: error.to_string(),
            },
        })
        .collect();
    Ok(serde_json::to_string(&outcomes)?)
}
