//! # Prop Dependency Analyzer
//!
//! Computes the exact set of data paths a UI component reads and validates it
//! against the component's explicit dependency list and its declared data
//! shape.
//!
//! ## Pipeline
//!
//! 1. **Shape resolution**: the declared shape (schema-builder object,
//!    TypeScript or Flow type) is lowered once into a `ShapeTree`.
//! 2. **Usage collection**: one traversal of the component body resolves local
//!    bindings symbolically and records every path read. Paths are canonical
//!    strings: `a[].b.c`.
//! 3. **Diff**: a pure comparison emits findings in a fixed order.
//!
//! ## Invariants
//!
//! 1. **No parsing**: the host supplies ESTree JSON; nothing here reads source
//!    text.
//! 2. **Per-invocation state**: declarations, scopes and caches live only for
//!    one component. Batches run components in parallel.
//! 3. **Degrade, don't fail**: unresolvable shapes become unknown and dynamic
//!    root keys are not tracked. Only a malformed dependency list or an
//!    unsupported body is an error.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod analyzer;
mod builtins;
mod collect;
mod differ;
mod finding;
mod options;
mod path;
mod registration;
mod scope;
mod shape;
mod shape_resolver;
mod syntax;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod collect_tests;

pub use analyzer::{
    analyze_component, analyze_components, analyze_json, AnalysisOutcome, ComponentAnalysis,
};
pub use collect::{collect_usage, UsageReport, UsedPath};
pub use differ::{diff, Dependency};
pub use finding::{AnalysisError, Finding, FindingKind};
pub use options::AnalysisOptions;
pub use path::{PathParseError, PathSegment, PropPath};
pub use registration::ComponentRegistration;
pub use shape::{Lookup, PrimitiveKind, ShapeNode, ShapeTree};
pub use shape_resolver::{discover_inline_shape, DeclarationContext, ShapeResolver};
pub use syntax::{Node, NodeLocation, SourceLocation, Span};

/// Node-API entry point: JSON array of registrations in, JSON array of
/// per-component outcomes out.
#[cfg(feature = "napi")]
#[napi]
pub fn analyze_components_native(registrations_json: String) -> napi::Result<String> {
    analyze_json(&registrations_json)
        .map_err(|e| napi::Error::from_reason(format!("Analysis error: {}", e)))
}
