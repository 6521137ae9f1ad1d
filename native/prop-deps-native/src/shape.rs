//! Shape Model for the Prop Dependency Analyzer
//!
//! Every declaration dialect (schema-builder calls, TypeScript, Flow) is
//! lowered into one `ShapeNode` tree. Nothing past the resolver looks at the
//! dialect a shape came from.

use crate::builtins;
use crate::path::{PathSegment, PropPath};
use crate::shape_resolver::ShapeResolver;
use indexmap::IndexMap;

// ═══════════════════════════════════════════════════════════════════════════════
// SHAPE NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Function,
    Object,
    /// `instanceOf`, `node`, `element`, `symbol`, unrecognized validators.
    Custom,
}

/// Reference to a named declaration, expanded on demand so recursive types
/// never unfold further than a lookup walks.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeReference {
    pub name: String,
    pub args: Vec<ShapeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeNode {
    Primitive(PrimitiveKind),
    /// Element shape; `Unknown` for an unrefined array.
    Array(Box<ShapeNode>),
    Object {
        children: IndexMap<String, ShapeNode>,
        /// Set when part of the declaration could not be resolved: local keys
        /// are known, absent keys are not reported.
        open: bool,
    },
    /// Any key maps to the value shape.
    Record(Box<ShapeNode>),
    Union(Vec<ShapeNode>),
    Unknown,
    Deferred(TypeReference),
}

impl ShapeNode {
    pub fn object(children: IndexMap<String, ShapeNode>) -> Self {
        ShapeNode::Object {
            children,
            open: false,
        }
    }

    pub fn array_of(element: ShapeNode) -> Self {
        ShapeNode::Array(Box::new(element))
    }

    pub fn record_of(value: ShapeNode) -> Self {
        ShapeNode::Record(Box::new(value))
    }

    /// Collapses trivial unions.
    pub fn union_of(mut branches: Vec<ShapeNode>) -> Self {
        match branches.len() {
            0 => ShapeNode::Unknown,
            1 => branches.remove(0),
            _ => ShapeNode::Union(branches),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ShapeNode::Unknown)
    }

    /// Primitive or array node that carries no structure beyond its kind.
    fn is_unrefined(&self) -> bool {
        match self {
            ShapeNode::Primitive(kind) => *kind != PrimitiveKind::Custom,
            ShapeNode::Array(element) => element.is_unknown(),
            _ => false,
        }
    }

    fn carries_builtin(&self, member: &str) -> bool {
        match self {
            ShapeNode::Primitive(kind) => builtins::is_builtin_member(*kind, member),
            ShapeNode::Array(element) if element.is_unknown() => builtins::is_array_member(member),
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHAPE TREE
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of walking a path through the shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(ShapeNode),
    /// The path names a key the shape does not declare.
    Missing,
    /// The walk reached a node that carries no key information.
    Opaque,
}

/// Resolved shape of one component's data object.
pub struct ShapeTree<'a> {
    resolver: ShapeResolver<'a>,
    root: ShapeNode,
    declared: bool,
}

impl<'a> ShapeTree<'a> {
    pub fn new(resolver: ShapeResolver<'a>, root: ShapeNode, declared: bool) -> Self {
        Self {
            resolver,
            root,
            declared,
        }
    }

    /// Tree for a component without any declared shape.
    pub fn undeclared(resolver: ShapeResolver<'a>) -> Self {
        Self::new(resolver, ShapeNode::Unknown, false)
    }

    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub fn root(&self) -> &ShapeNode {
        &self.root
    }

    pub fn lookup(&self, path: &PropPath) -> Lookup {
        let mut current = self.resolver.force(self.root.clone());
        for segment in path.segments() {
            match self.step(current, segment) {
                Lookup::Found(next) => current = self.resolver.force(next),
                other => return other,
            }
        }
        Lookup::Found(current)
    }

    fn step(&self, node: ShapeNode, segment: &PathSegment) -> Lookup {
        match node {
            ShapeNode::Unknown | ShapeNode::Primitive(_) | ShapeNode::Deferred(_) => {
                Lookup::Opaque
            }
            ShapeNode::Object { children, open } => match segment {
                PathSegment::Key(name) => match children.get(name) {
                    Some(child) => Lookup::Found(child.clone()),
                    None if open => Lookup::Opaque,
                    None => Lookup::Missing,
                },
                PathSegment::Element | PathSegment::Rest => Lookup::Opaque,
            },
            ShapeNode::Array(element) => match segment {
                PathSegment::Element => Lookup::Found(*element),
                PathSegment::Key(name) if builtins::is_array_member(name) => Lookup::Opaque,
                // an unrefined array says nothing about its other members
                PathSegment::Key(_) if element.is_unknown() => Lookup::Opaque,
                PathSegment::Key(_) => Lookup::Missing,
                PathSegment::Rest => Lookup::Opaque,
            },
            ShapeNode::Record(value) => match segment {
                PathSegment::Rest => Lookup::Opaque,
                _ => Lookup::Found(*value),
            },
            ShapeNode::Union(branches) => {
                let mut found = Vec::new();
                for branch in branches {
                    match self.step(self.resolver.force(branch), segment) {
                        Lookup::Found(next) => found.push(next),
                        Lookup::Opaque => found.push(ShapeNode::Unknown),
                        Lookup::Missing => {}
                    }
                }
                if found.is_empty() {
                    Lookup::Missing
                } else {
                    Lookup::Found(ShapeNode::union_of(found))
                }
            }
        }
    }

    /// Keys the shape declares at `path`, in declaration order. Empty when the
    /// shape carries no key information there.
    pub fn known_keys(&self, path: &PropPath) -> Vec<String> {
        let mut keys = Vec::new();
        if let Lookup::Found(node) = self.lookup(path) {
            self.collect_keys(node, &mut keys);
        }
        keys
    }

    fn collect_keys(&self, node: ShapeNode, keys: &mut Vec<String>) {
        match node {
            ShapeNode::Object { children, .. } => {
                for key in children.keys() {
                    if !keys.contains(key) {
                        keys.push(key.clone());
                    }
                }
            }
            ShapeNode::Union(branches) => {
                for branch in branches {
                    self.collect_keys(self.resolver.force(branch), keys);
                }
            }
            _ => {}
        }
    }

    /// True when `member` read on the value at `path` comes from the value's
    /// prototype rather than from the data.
    pub fn is_builtin_member(&self, path: &PropPath, member: &str) -> bool {
        self.unrefined_nodes(path)
            .is_some_and(|nodes| nodes.iter().any(|node| node.carries_builtin(member)))
    }

    /// True when the value at `path` is an unrefined primitive or array, or a
    /// union made only of those: nothing below it is tracked separately.
    pub fn is_unrefined(&self, path: &PropPath) -> bool {
        self.unrefined_nodes(path).is_some()
    }

    fn unrefined_nodes(&self, path: &PropPath) -> Option<Vec<ShapeNode>> {
        let Lookup::Found(node) = self.lookup(path) else {
            return None;
        };
        let nodes: Vec<ShapeNode> = match node {
            ShapeNode::Union(branches) => branches
                .into_iter()
                .map(|branch| self.resolver.force(branch))
                .collect(),
            other => vec![other],
        };
        nodes.iter().all(ShapeNode::is_unrefined).then_some(nodes)
    }
}
