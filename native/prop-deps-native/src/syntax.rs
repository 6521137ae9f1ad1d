//! Syntax View for the Prop Dependency Analyzer
//!
//! The analyzer never parses source text. Hosts hand over the tree their own
//! parser produced, serialized in the ESTree JSON dialect, and every module
//! reads it through the borrowed `Node` view defined here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// LOCATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Byte range of a node in the host's source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

/// Opaque location handed back to the host with every finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLocation {
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<SourceLocation>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE VIEW
// ═══════════════════════════════════════════════════════════════════════════════

/// Fields that carry positions rather than syntax.
const NON_SYNTAX_FIELDS: &[&str] = &["type", "loc", "range", "start", "end", "parent"];

/// Expression wrappers that never change the value they wrap.
const TRANSPARENT_WRAPPERS: &[&str] = &[
    "ParenthesizedExpression",
    "ChainExpression",
    "TSAsExpression",
    "TSSatisfiesExpression",
    "TSNonNullExpression",
    "TSTypeAssertion",
    "TypeCastExpression",
];

/// A borrowed view over one ESTree node: any JSON object with a string `type`.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    value: &'a Value,
    kind: &'a str,
}

impl<'a> Node<'a> {
    pub fn new(value: &'a Value) -> Option<Self> {
        let kind = value.get("type")?.as_str()?;
        Some(Self { value, kind })
    }

    pub fn kind(&self) -> &'a str {
        self.kind
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn is_any(&self, kinds: &[&str]) -> bool {
        kinds.contains(&self.kind)
    }

    pub fn raw(&self) -> &'a Value {
        self.value
    }

    /// Single child node stored under `name`.
    pub fn field(&self, name: &str) -> Option<Node<'a>> {
        self.value.get(name).and_then(Node::new)
    }

    /// Child nodes stored in the array under `name`, skipping holes.
    pub fn list(&self, name: &str) -> impl Iterator<Item = Node<'a>> + 'a {
        self.value
            .get(name)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Node::new)
    }

    /// Like `list`, but keeps holes (`[, b] = xs`) as `None`.
    pub fn slots(&self, name: &str) -> Vec<Option<Node<'a>>> {
        self.value
            .get(name)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Node::new).collect())
            .unwrap_or_default()
    }

    pub fn str_field(&self, name: &str) -> Option<&'a str> {
        self.value.get(name).and_then(Value::as_str)
    }

    pub fn bool_field(&self, name: &str) -> bool {
        self.value
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Every syntax child in field order (the tree is read with `preserve_order`).
    pub fn children(&self) -> Vec<Node<'a>> {
        let mut out = Vec::new();
        let Some(object) = self.value.as_object() else {
            return out;
        };
        for (key, child) in object {
            if NON_SYNTAX_FIELDS.contains(&key.as_str()) {
                continue;
            }
            match child {
                Value::Array(items) => out.extend(items.iter().filter_map(Node::new)),
                other => out.extend(Node::new(other)),
            }
        }
        out
    }

    pub fn span(&self) -> Span {
        if let Some(range) = self.value.get("range").and_then(Value::as_array) {
            let start = range.first().and_then(Value::as_u64).unwrap_or(0);
            let end = range.get(1).and_then(Value::as_u64).unwrap_or(start);
            return Span {
                start: start as u32,
                end: end as u32,
            };
        }
        let start = self.value.get("start").and_then(Value::as_u64).unwrap_or(0);
        let end = self.value.get("end").and_then(Value::as_u64).unwrap_or(start);
        Span {
            start: start as u32,
            end: end as u32,
        }
    }

    pub fn location(&self) -> NodeLocation {
        let start = self
            .value
            .get("loc")
            .and_then(|loc| loc.get("start"))
            .and_then(|pos| {
                Some(SourceLocation {
                    line: pos.get("line")?.as_u64()? as u32,
                    column: pos.get("column")?.as_u64()? as u32,
                })
            });
        NodeLocation {
            span: self.span(),
            start,
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Convenience readers
    // ───────────────────────────────────────────────────────────────────────────

    /// Name of an identifier-like node.
    pub fn name(&self) -> Option<&'a str> {
        match self.kind {
            "Identifier" | "JSXIdentifier" | "PrivateIdentifier" | "PrivateName" => {
                self.str_field("name")
            }
            _ => None,
        }
    }

    /// Statically known string: string literals and template literals without
    /// substitutions.
    pub fn string_value(&self) -> Option<&'a str> {
        match self.kind {
            "Literal" | "StringLiteral" => self.value.get("value").and_then(Value::as_str),
            "TemplateLiteral" => {
                if self.list("expressions").next().is_some() {
                    return None;
                }
                let quasi = self.list("quasis").next()?;
                let value = quasi.raw().get("value")?;
                value
                    .get("cooked")
                    .and_then(Value::as_str)
                    .or_else(|| value.get("raw").and_then(Value::as_str))
            }
            _ => None,
        }
    }

    pub fn numeric_value(&self) -> Option<f64> {
        match self.kind {
            "Literal" | "NumericLiteral" => self.value.get("value").and_then(Value::as_f64),
            _ => None,
        }
    }

    /// Key of a property-like node (`Property`, `MethodDefinition`,
    /// `TSPropertySignature`, ...) when it is statically known.
    pub fn static_key(&self) -> Option<String> {
        let key = self.field("key")?;
        if self.bool_field("computed") {
            return key.string_value().map(str::to_string);
        }
        if let Some(name) = key.name() {
            return Some(name.to_string());
        }
        if let Some(text) = key.string_value() {
            return Some(text.to_string());
        }
        key.numeric_value().map(|n| n.to_string())
    }

    /// Strips parentheses, optional chains and type assertions.
    pub fn unwrap_expression(self) -> Node<'a> {
        let mut current = self;
        while current.is_any(TRANSPARENT_WRAPPERS) {
            match current.field("expression") {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }

    /// Dotted rendering of an identifier/`this`/static member chain:
    /// `Object.freeze`, `this.setState`.
    pub fn dotted_name(&self) -> Option<String> {
        let node = self.unwrap_expression();
        match node.kind {
            "ThisExpression" => Some("this".to_string()),
            "MemberExpression" | "JSXMemberExpression" | "TSQualifiedName"
            | "QualifiedTypeIdentifier" => {
                if node.bool_field("computed") {
                    return None;
                }
                let (left, right) = match node.kind {
                    "TSQualifiedName" => (node.field("left")?, node.field("right")?),
                    "QualifiedTypeIdentifier" => (node.field("qualification")?, node.field("id")?),
                    _ => (node.field("object")?, node.field("property")?),
                };
                Some(format!("{}.{}", left.dotted_name()?, right.name()?))
            }
            _ => node.name().map(str::to_string),
        }
    }

    pub fn is_function(&self) -> bool {
        self.is_any(&[
            "FunctionDeclaration",
            "FunctionExpression",
            "ArrowFunctionExpression",
        ])
    }

    pub fn is_class(&self) -> bool {
        self.is_any(&["ClassDeclaration", "ClassExpression"])
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span();
        write!(f, "{}@{}..{}", self.kind, span.start, span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_span_prefers_range() {
        let value = json!({ "type": "Identifier", "name": "a", "range": [4, 5], "start": 0, "end": 1 });
        let node = Node::new(&value).unwrap();
        assert_eq!(node.span(), Span { start: 4, end: 5 });
    }

    #[test]
    fn test_location_reads_loc_start() {
        let value = json!({
            "type": "Identifier",
            "name": "a",
            "start": 10,
            "end": 11,
            "loc": { "start": { "line": 3, "column": 7 }, "end": { "line": 3, "column": 8 } }
        });
        let location = Node::new(&value).unwrap().location();
        assert_eq!(location.span, Span { start: 10, end: 11 });
        assert_eq!(location.start, Some(SourceLocation { line: 3, column: 7 }));
    }

    #[test]
    fn test_static_key_variants() {
        let plain = json!({ "type": "Property", "computed": false, "key": { "type": "Identifier", "name": "a" } });
        let quoted = json!({ "type": "Property", "computed": false, "key": { "type": "Literal", "value": "aria-label" } });
        let computed = json!({ "type": "Property", "computed": true, "key": { "type": "Identifier", "name": "k" } });
        assert_eq!(Node::new(&plain).unwrap().static_key().as_deref(), Some("a"));
        assert_eq!(Node::new(&quoted).unwrap().static_key().as_deref(), Some("aria-label"));
        assert_eq!(Node::new(&computed).unwrap().static_key(), None);
    }

    #[test]
    fn test_unwrap_expression_strips_wrappers() {
        let value = json!({
            "type": "TSNonNullExpression",
            "expression": {
                "type": "ParenthesizedExpression",
                "expression": { "type": "Identifier", "name": "props" }
            }
        });
        let node = Node::new(&value).unwrap().unwrap_expression();
        assert_eq!(node.name(), Some("props"));
    }

    #[test]
    fn test_dotted_name() {
        let value = json!({
            "type": "MemberExpression",
            "computed": false,
            "object": { "type": "ThisExpression" },
            "property": { "type": "Identifier", "name": "setState" }
        });
        assert_eq!(Node::new(&value).unwrap().dotted_name().as_deref(), Some("this.setState"));
    }

    #[test]
    fn test_children_skip_positions_and_holes() {
        let value = json!({
            "type": "ArrayPattern",
            "range": [0, 9],
            "elements": [null, { "type": "Identifier", "name": "b" }]
        });
        let node = Node::new(&value).unwrap();
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.slots("elements").len(), 2);
    }
}
