//! Usage Collector Module for the Prop Dependency Analyzer
//!
//! One traversal over the component body resolves local bindings and records
//! every property path the component reads. Control flow never gates
//! recording: every branch is visited and results are unioned by canonical
//! string.
//!
//! Each expression is evaluated to a symbolic `BindingValue`; what happens to
//! that value depends on how the surrounding code uses it:
//!
//! - `Read`: terminal use (rendered, passed, returned, called). Paths are
//!   recorded here.
//! - `Deref`: the value is the object of a member access; only the deeper path
//!   is recorded.
//! - `Bind`: the value flows into a local binding.
//! - `Spread`: the whole object is forwarded.

use crate::builtins;
use crate::finding::AnalysisError;
use crate::path::{PathSegment, PropPath};
use crate::scope::{BindingValue, FrameKind, PendingBody, ScopeChain, ThisBinding};
use crate::shape::ShapeTree;
use crate::syntax::{Node, NodeLocation};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Read,
    Deref,
    Bind,
    Spread,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsedPath {
    pub path: PropPath,
    /// First place the path was read.
    pub location: NodeLocation,
}

/// Everything the traversal learned about one component.
#[derive(Debug, Clone, Default)]
pub struct UsageReport {
    pub used: IndexMap<String, UsedPath>,
    /// Builtin-prototype accesses (`arr.length`) that were not recorded.
    pub exempt: IndexSet<String>,
    /// Objects forwarded whole with a spread.
    pub consumed: Vec<PropPath>,
}

impl UsageReport {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.used.keys().map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.used.contains_key(path)
    }

    pub fn is_consumed(&self, path: &PropPath) -> bool {
        self.consumed.iter().any(|object| path.starts_with(object))
    }
}

/// Collects the paths read by the component `body` against `shape`.
pub fn collect_usage<'a>(
    body: Node<'a>,
    shape: &'a ShapeTree<'a>,
) -> Result<UsageReport, AnalysisError> {
    let mut collector = UsageCollector::new(shape);
    collector.visit_component(body)?;
    Ok(collector.finish())
}

pub struct UsageCollector<'a> {
    shape: &'a ShapeTree<'a>,
    scopes: ScopeChain<'a>,
    report: UsageReport,
}

impl<'a> UsageCollector<'a> {
    pub fn new(shape: &'a ShapeTree<'a>) -> Self {
        Self {
            shape,
            scopes: ScopeChain::new(),
            report: UsageReport::default(),
        }
    }

    pub fn finish(mut self) -> UsageReport {
        let consumed = std::mem::take(&mut self.report.consumed);
        self.report
            .used
            .retain(|_, used| !consumed.iter().any(|object| used.path.starts_with(object)));
        self.report.consumed = consumed;
        debug!(
            used = self.report.used.len(),
            exempt = self.report.exempt.len(),
            consumed = self.report.consumed.len(),
            "usage collected"
        );
        self.report
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // COMPONENT ENTRY POINTS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn visit_component(&mut self, body: Node<'a>) -> Result<(), AnalysisError> {
        let body = body.unwrap_expression();
        match body.kind() {
            "FunctionDeclaration" | "FunctionExpression" | "ArrowFunctionExpression" => {
                self.visit_function(PendingBody {
                    node: body,
                    this_binding: ThisBinding::Other,
                    seeds: vec![(0, BindingValue::RootProps)],
                });
            }
            "ClassDeclaration" | "ClassExpression" => self.visit_component_class(body),
            "ObjectExpression" => self.visit_component_object(body),
            "CallExpression" => {
                // createReactClass({..})
                let definition = body
                    .list("arguments")
                    .next()
                    .map(Node::unwrap_expression)
                    .filter(|definition| definition.is("ObjectExpression"));
                match definition {
                    Some(definition) => self.visit_component_object(definition),
                    None => {
                        return Err(AnalysisError::UnsupportedComponent {
                            kind: body.kind().to_string(),
                        })
                    }
                }
            }
            kind => {
                return Err(AnalysisError::UnsupportedComponent {
                    kind: kind.to_string(),
                })
            }
        }
        Ok(())
    }

    fn visit_component_class(&mut self, class: Node<'a>) {
        if let Some(superclass) = class.field("superClass") {
            self.read(superclass);
        }
        let Some(class_body) = class.field("body") else {
            return;
        };
        self.scopes.push(FrameKind::Function(ThisBinding::Component));
        for member in class_body.list("body") {
            let is_static = member.bool_field("static");
            let this_binding = if is_static {
                ThisBinding::Other
            } else {
                ThisBinding::Component
            };
            match member.kind() {
                "MethodDefinition" | "TSAbstractMethodDefinition" => {
                    let Some(function) = member.field("value") else {
                        continue;
                    };
                    let seeds = lifecycle_seeds(member.static_key().as_deref());
                    self.visit_function(PendingBody {
                        node: function,
                        this_binding,
                        seeds,
                    });
                }
                "PropertyDefinition" | "ClassProperty" | "ClassPrivateProperty" => {
                    let Some(value) = member.field("value") else {
                        continue;
                    };
                    self.scopes.push(FrameKind::Function(this_binding));
                    self.read(value);
                    self.finish_frame();
                }
                "StaticBlock" => {
                    self.scopes.push(FrameKind::Function(ThisBinding::Other));
                    self.visit_statements(member.list("body"));
                    self.finish_frame();
                }
                _ => {}
            }
        }
        self.finish_frame();
    }

    fn visit_component_object(&mut self, definition: Node<'a>) {
        self.scopes.push(FrameKind::Function(ThisBinding::Component));
        for property in definition.list("properties") {
            let Some(value) = property.field("value").map(Node::unwrap_expression) else {
                continue;
            };
            if value.is_function() {
                self.visit_function(PendingBody {
                    node: value,
                    this_binding: ThisBinding::Component,
                    seeds: lifecycle_seeds(property.static_key().as_deref()),
                });
            } else if property.static_key().as_deref() != Some("propTypes") {
                self.read(value);
            }
        }
        self.finish_frame();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FUNCTIONS AND FRAMES
    // ═══════════════════════════════════════════════════════════════════════════

    fn visit_function(&mut self, pending: PendingBody<'a>) {
        let function = pending.node;
        if function.is_class() {
            self.visit_nested_class(function);
            return;
        }
        let this_binding = if function.is("ArrowFunctionExpression") {
            ThisBinding::Inherit
        } else {
            pending.this_binding
        };
        self.scopes.push(FrameKind::Function(this_binding));
        for (index, param) in function.list("params").enumerate() {
            let seeded = pending
                .seeds
                .iter()
                .find(|(seed_index, _)| *seed_index == index)
                .map(|(_, value)| value.clone());
            let param = if param.is("TSParameterProperty") {
                param.field("parameter").unwrap_or(param)
            } else {
                param
            };
            match seeded {
                Some(value) => self.bind_pattern(param, value, true),
                None => self.bind_pattern(param, BindingValue::Opaque, false),
            }
        }
        match function.field("body") {
            Some(body) if body.is("BlockStatement") => self.visit_statements(body.list("body")),
            Some(body) => self.read(body),
            None => {}
        }
        self.finish_frame();
    }

    /// A class declared inside the component: its `this` is not the component.
    fn visit_nested_class(&mut self, class: Node<'a>) {
        if let Some(superclass) = class.field("superClass") {
            self.read(superclass);
        }
        let Some(class_body) = class.field("body") else {
            return;
        };
        self.scopes.push(FrameKind::Function(ThisBinding::Other));
        for member in class_body.list("body") {
            if let Some(value) = member.field("value") {
                if value.is_function() {
                    self.visit_function(PendingBody {
                        node: value,
                        this_binding: ThisBinding::Other,
                        seeds: Vec::new(),
                    });
                } else {
                    self.read(value);
                }
            }
        }
        self.finish_frame();
    }

    fn defer(&mut self, node: Node<'a>, seeds: Vec<(usize, BindingValue)>) {
        let this_binding = if node.is("ArrowFunctionExpression") {
            ThisBinding::Inherit
        } else {
            ThisBinding::Other
        };
        self.scopes.defer(PendingBody {
            node,
            this_binding,
            seeds,
        });
    }

    /// Runs the bodies queued in the current frame, then pops it and records
    /// the path bindings nothing referenced.
    fn finish_frame(&mut self) {
        loop {
            let pending = self.scopes.take_pending();
            if pending.is_empty() {
                break;
            }
            for body in pending {
                self.visit_function(body);
            }
        }
        if let Some(frame) = self.scopes.pop() {
            for (path, location) in frame.unused_paths() {
                trace!(path = %path, "unused destructured binding");
                self.record(path, location);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATEMENTS
    // ═══════════════════════════════════════════════════════════════════════════

    fn visit_statements(&mut self, statements: impl Iterator<Item = Node<'a>>) {
        for statement in statements {
            self.visit_statement(statement);
        }
    }

    fn visit_block(&mut self, node: Node<'a>) {
        self.scopes.push(FrameKind::Block);
        if node.is("BlockStatement") {
            self.visit_statements(node.list("body"));
        } else {
            self.visit_statement(node);
        }
        self.finish_frame();
    }

    fn visit_statement(&mut self, node: Node<'a>) {
        match node.kind() {
            "ExpressionStatement" => {
                if let Some(expression) = node.field("expression") {
                    self.read(expression);
                }
            }
            "VariableDeclaration" => {
                for declarator in node.list("declarations") {
                    self.visit_declarator(declarator);
                }
            }
            "FunctionDeclaration" => {
                if let Some(name) = node.field("id").and_then(|id| id.name()) {
                    self.scopes
                        .declare(name, BindingValue::Opaque, node.location(), false);
                }
                self.defer(node, Vec::new());
            }
            "ClassDeclaration" => {
                if let Some(name) = node.field("id").and_then(|id| id.name()) {
                    self.scopes
                        .declare(name, BindingValue::Opaque, node.location(), false);
                }
                self.defer(node, Vec::new());
            }
            "ReturnStatement" | "ThrowStatement" => {
                if let Some(argument) = node.field("argument") {
                    self.read(argument);
                }
            }
            "BlockStatement" | "StaticBlock" => self.visit_block(node),
            "IfStatement" => {
                if let Some(test) = node.field("test") {
                    self.read(test);
                }
                if let Some(consequent) = node.field("consequent") {
                    self.visit_block(consequent);
                }
                if let Some(alternate) = node.field("alternate") {
                    self.visit_block(alternate);
                }
            }
            "ForStatement" => {
                self.scopes.push(FrameKind::Block);
                if let Some(init) = node.field("init") {
                    if init.is("VariableDeclaration") {
                        self.visit_statement(init);
                    } else {
                        self.read(init);
                    }
                }
                for field in ["test", "update"] {
                    if let Some(expression) = node.field(field) {
                        self.read(expression);
                    }
                }
                if let Some(body) = node.field("body") {
                    self.visit_block(body);
                }
                self.finish_frame();
            }
            "ForOfStatement" | "ForInStatement" => self.visit_for_each(node),
            "WhileStatement" | "DoWhileStatement" => {
                if let Some(test) = node.field("test") {
                    self.read(test);
                }
                if let Some(body) = node.field("body") {
                    self.visit_block(body);
                }
            }
            "SwitchStatement" => {
                if let Some(discriminant) = node.field("discriminant") {
                    self.read(discriminant);
                }
                self.scopes.push(FrameKind::Block);
                for case in node.list("cases") {
                    if let Some(test) = case.field("test") {
                        self.read(test);
                    }
                    self.visit_statements(case.list("consequent"));
                }
                self.finish_frame();
            }
            "TryStatement" => {
                if let Some(block) = node.field("block") {
                    self.visit_block(block);
                }
                if let Some(handler) = node.field("handler") {
                    self.scopes.push(FrameKind::Block);
                    if let Some(param) = handler.field("param") {
                        self.bind_pattern(param, BindingValue::Opaque, false);
                    }
                    if let Some(body) = handler.field("body") {
                        self.visit_statements(body.list("body"));
                    }
                    self.finish_frame();
                }
                if let Some(finalizer) = node.field("finalizer") {
                    self.visit_block(finalizer);
                }
            }
            "LabeledStatement" => {
                if let Some(body) = node.field("body") {
                    self.visit_statement(body);
                }
            }
            "ExportNamedDeclaration" | "ExportDefaultDeclaration" => {
                if let Some(declaration) = node.field("declaration") {
                    self.visit_statement(declaration);
                }
            }
            "EmptyStatement" | "BreakStatement" | "ContinueStatement" | "DebuggerStatement" => {}
            kind if kind.starts_with("TS") || kind.starts_with("Declare") || kind == "TypeAlias" => {}
            kind if kind.ends_with("Expression") || kind == "Identifier" => self.read(node),
            _ => {
                for child in node.children() {
                    self.visit_statement(child);
                }
            }
        }
    }

    fn visit_declarator(&mut self, declarator: Node<'a>) {
        let Some(id) = declarator.field("id") else {
            return;
        };
        let Some(init) = declarator.field("init") else {
            self.bind_pattern(id, BindingValue::Opaque, false);
            return;
        };
        let value = self.eval(init, Usage::Bind);
        self.bind_pattern(id, value, true);
    }

    fn visit_for_each(&mut self, node: Node<'a>) {
        self.scopes.push(FrameKind::Block);
        let element = match node.field("right") {
            Some(right) if node.is("ForOfStatement") => {
                self.eval(right, Usage::Bind).member(PathSegment::Element)
            }
            Some(right) => {
                self.read(right);
                BindingValue::Opaque
            }
            None => BindingValue::Opaque,
        };
        if let Some(left) = node.field("left") {
            if left.is("VariableDeclaration") {
                for declarator in left.list("declarations") {
                    if let Some(id) = declarator.field("id") {
                        self.bind_pattern(id, element.clone(), true);
                    }
                }
            } else {
                self.assign_pattern(left, element);
            }
        }
        if let Some(body) = node.field("body") {
            self.visit_block(body);
        }
        self.finish_frame();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PATTERNS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Declares every name in `pattern` with the value it takes from `value`.
    fn bind_pattern(&mut self, pattern: Node<'a>, value: BindingValue, tracked: bool) {
        match pattern.kind() {
            "Identifier" => {
                if let Some(name) = pattern.name() {
                    let tracked = tracked && matches!(value, BindingValue::PropsPath(_));
                    self.scopes.declare(name, value, pattern.location(), tracked);
                }
            }
            "AssignmentPattern" => {
                if let Some(default) = pattern.field("right") {
                    self.read(default);
                }
                if let Some(left) = pattern.field("left") {
                    self.bind_pattern(left, value, tracked);
                }
            }
            "ObjectPattern" => {
                let mut named = Vec::new();
                for property in pattern.list("properties") {
                    if property.is("RestElement") {
                        let rest = rest_of(&value, &named);
                        if let Some(argument) = property.field("argument") {
                            self.bind_pattern(argument, rest, false);
                        }
                        continue;
                    }
                    let segment = self.property_segment(&value, property);
                    if let Some(PathSegment::Key(key)) = &segment {
                        named.push(key.clone());
                    }
                    let child = segment.map_or(BindingValue::Opaque, |segment| value.member(segment));
                    if let Some(target) = property.field("value") {
                        self.bind_pattern(target, child, tracked);
                    }
                }
            }
            "ArrayPattern" => {
                for element in pattern.slots("elements").into_iter().flatten() {
                    if element.is("RestElement") {
                        if let Some(argument) = element.field("argument") {
                            self.bind_pattern(argument, value.clone(), tracked);
                        }
                    } else {
                        self.bind_pattern(element, value.member(PathSegment::Element), tracked);
                    }
                }
            }
            "RestElement" => {
                if let Some(argument) = pattern.field("argument") {
                    self.bind_pattern(argument, value, false);
                }
            }
            _ => {}
        }
    }

    /// Destructuring or plain assignment to names that already exist.
    fn assign_pattern(&mut self, target: Node<'a>, value: BindingValue) {
        match target.kind() {
            "Identifier" => {
                let Some(name) = target.name() else {
                    return;
                };
                if let Some((path, location)) = self.scopes.rebind(name, value, target.location()) {
                    self.record(path, location);
                }
            }
            "ObjectPattern" => {
                let mut named = Vec::new();
                for property in target.list("properties") {
                    if property.is("RestElement") {
                        if let Some(argument) = property.field("argument") {
                            self.assign_pattern(argument, rest_of(&value, &named));
                        }
                        continue;
                    }
                    let segment = self.property_segment(&value, property);
                    if let Some(PathSegment::Key(key)) = &segment {
                        named.push(key.clone());
                    }
                    let child = segment.map_or(BindingValue::Opaque, |segment| value.member(segment));
                    if let Some(inner) = property.field("value") {
                        self.assign_pattern(inner, child);
                    }
                }
            }
            "ArrayPattern" => {
                for element in target.slots("elements").into_iter().flatten() {
                    self.assign_pattern(element, value.member(PathSegment::Element));
                }
            }
            "AssignmentPattern" => {
                if let Some(default) = target.field("right") {
                    self.read(default);
                }
                if let Some(left) = target.field("left") {
                    self.assign_pattern(left, value);
                }
            }
            "RestElement" => {
                if let Some(argument) = target.field("argument") {
                    self.assign_pattern(argument, value);
                }
            }
            _ => {
                // member target: `this.cache = props.a`
                self.eval(target, Usage::Deref);
                self.consume(value, Usage::Read, target.location());
            }
        }
    }

    fn property_segment(&mut self, value: &BindingValue, property: Node<'a>) -> Option<PathSegment> {
        if !property.bool_field("computed") {
            return property.static_key().map(PathSegment::Key);
        }
        let key = property.field("key")?;
        self.computed_segment(value, key)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EXPRESSIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Terminal use of an expression.
    pub fn read(&mut self, node: Node<'a>) {
        let value = self.eval(node, Usage::Read);
        self.consume(value, Usage::Read, node.location());
    }

    fn spread(&mut self, node: Node<'a>) {
        let value = self.eval(node, Usage::Spread);
        self.consume(value, Usage::Spread, node.location());
    }

    fn consume(&mut self, value: BindingValue, usage: Usage, location: NodeLocation) {
        match (value, usage) {
            (BindingValue::PropsPath(path), Usage::Read) => self.record(path, location),
            (BindingValue::RootProps, Usage::Read) => {
                trace!("data object read as a whole; nothing recorded");
            }
            (BindingValue::PropsPath(path), Usage::Spread) => self.report.consumed.push(path),
            (BindingValue::RootProps, Usage::Spread) => self.report.consumed.push(PropPath::root()),
            (BindingValue::RestOf { parent, excluded }, Usage::Read | Usage::Spread) => {
                for key in self.shape.known_keys(&parent) {
                    if !excluded.contains(&key) {
                        self.record(parent.child_key(&key), location);
                    }
                }
            }
            _ => {}
        }
    }

    fn record(&mut self, path: PropPath, location: NodeLocation) {
        let path = path.trim_trailing_elements();
        if path.is_root() {
            return;
        }
        let key = path.to_string();
        self.report
            .used
            .entry(key)
            .or_insert(UsedPath { path, location });
    }

    /// Evaluates `node` to its symbolic value. Sub-expressions whose values do
    /// not flow into the result are consumed here.
    pub fn eval(&mut self, node: Node<'a>, usage: Usage) -> BindingValue {
        let node = node.unwrap_expression();
        match node.kind() {
            "Identifier" => match node.name() {
                Some(name) => self.scopes.reference(name),
                None => BindingValue::Opaque,
            },
            "ThisExpression" => self.scopes.this_value(),
            "MemberExpression" | "OptionalMemberExpression" => self.eval_member(node),
            "CallExpression" | "OptionalCallExpression" | "NewExpression" => {
                self.eval_call(node);
                BindingValue::Opaque
            }
            "AssignmentExpression" => self.eval_assignment(node, usage),
            "LogicalExpression" => {
                let (Some(left), Some(right)) = (node.field("left"), node.field("right")) else {
                    return BindingValue::Opaque;
                };
                if node.str_field("operator") == Some("&&") {
                    self.read(left);
                    self.flow(&[right], usage)
                } else {
                    self.flow(&[left, right], usage)
                }
            }
            "ConditionalExpression" => {
                if let Some(test) = node.field("test") {
                    self.read(test);
                }
                let branches: Vec<Node<'a>> = ["consequent", "alternate"]
                    .iter()
                    .filter_map(|field| node.field(field))
                    .collect();
                self.flow(&branches, usage)
            }
            "SequenceExpression" => {
                let expressions: Vec<Node<'a>> = node.list("expressions").collect();
                let Some((last, rest)) = expressions.split_last() else {
                    return BindingValue::Opaque;
                };
                for expression in rest {
                    self.read(*expression);
                }
                self.eval(*last, usage)
            }
            "AwaitExpression" => match node.field("argument") {
                Some(argument) => self.eval(argument, usage),
                None => BindingValue::Opaque,
            },
            "FunctionExpression" | "ArrowFunctionExpression" | "ClassExpression" => {
                self.defer(node, Vec::new());
                BindingValue::Opaque
            }
            "ObjectExpression" => {
                self.eval_object_literal(node);
                BindingValue::Opaque
            }
            "ArrayExpression" => {
                for element in node.list("elements") {
                    self.read_or_spread(element);
                }
                BindingValue::Opaque
            }
            "JSXElement" | "JSXFragment" => {
                self.eval_jsx(node);
                BindingValue::Opaque
            }
            "JSXExpressionContainer" => match node.field("expression") {
                Some(expression) if !expression.is("JSXEmptyExpression") => {
                    self.eval(expression, usage)
                }
                _ => BindingValue::Opaque,
            },
            "Literal" | "StringLiteral" | "NumericLiteral" | "BooleanLiteral" | "NullLiteral"
            | "RegExpLiteral" | "BigIntLiteral" | "Super" | "MetaProperty" | "JSXText" => {
                BindingValue::Opaque
            }
            _ => {
                // operators, templates and anything else: every operand is read
                for child in node.children() {
                    if child.is_any(&["SpreadElement", "JSXSpreadAttribute"]) {
                        self.read_or_spread(child);
                    } else if !child.kind().starts_with("TS") {
                        self.read(child);
                    }
                }
                BindingValue::Opaque
            }
        }
    }

    /// Operands whose value becomes the expression's value. Terminal usages
    /// consume each one; otherwise the first data value is carried forward
    /// and the others are read.
    fn flow(&mut self, operands: &[Node<'a>], usage: Usage) -> BindingValue {
        if matches!(usage, Usage::Read | Usage::Spread) {
            for operand in operands {
                let value = self.eval(*operand, usage);
                self.consume(value, usage, operand.location());
            }
            return BindingValue::Opaque;
        }
        let mut carried = BindingValue::Opaque;
        for operand in operands {
            let value = self.eval(*operand, usage);
            if !value.is_props() {
                continue;
            }
            if carried.is_props() {
                self.consume(value, Usage::Read, operand.location());
            } else {
                carried = value;
            }
        }
        carried
    }

    fn eval_member(&mut self, node: Node<'a>) -> BindingValue {
        let (Some(object), Some(property)) = (node.field("object"), node.field("property")) else {
            return BindingValue::Opaque;
        };
        let object_value = self.eval(object, Usage::Deref);
        let segment = if node.bool_field("computed") {
            self.computed_segment(&object_value, property)
        } else {
            property.name().map(|name| PathSegment::Key(name.to_string()))
        };
        let Some(segment) = segment else {
            return BindingValue::Opaque;
        };
        if let (BindingValue::PropsPath(path), PathSegment::Key(member)) = (&object_value, &segment) {
            if self.shape.is_builtin_member(path, member) {
                trace!(path = %path, member = %member, "builtin member access exempted");
                self.report.exempt.insert(path.child_key(member).to_string());
                return BindingValue::Opaque;
            }
            if self.shape.is_unrefined(path) {
                trace!(path = %path, member = %member, "member of unrefined value kept at its parent");
                return object_value;
            }
        }
        object_value.member(segment)
    }

    /// Segment named by a computed key. `None` when the key cannot be known.
    fn computed_segment(&mut self, object: &BindingValue, key: Node<'a>) -> Option<PathSegment> {
        let key = key.unwrap_expression();
        if let Some(text) = key.string_value() {
            return Some(PathSegment::Key(text.to_string()));
        }
        let at_root = matches!(
            object,
            BindingValue::RootProps | BindingValue::RestOf { .. }
        );
        if !at_root {
            self.read(key);
            return Some(PathSegment::Element);
        }
        if let Some(number) = key.numeric_value() {
            return Some(PathSegment::Key(format_number(number)));
        }
        self.read(key);
        if object.is_props() {
            trace!(?key, "dynamic key on the data object; access not tracked");
        }
        None
    }

    fn eval_call(&mut self, node: Node<'a>) {
        let callee = node.field("callee").map(Node::unwrap_expression);
        let is_set_state = callee
            .and_then(|callee| callee.dotted_name())
            .is_some_and(|name| name == "this.setState")
            && self.scopes.this_value() == BindingValue::Instance;
        if let Some(callee) = callee {
            self.read(callee);
        }
        for (index, argument) in node.list("arguments").enumerate() {
            let argument = argument.unwrap_expression();
            if argument.is_function() {
                let seeds = if is_set_state && index == 0 {
                    vec![(1, BindingValue::RootProps)]
                } else {
                    Vec::new()
                };
                self.defer(argument, seeds);
            } else {
                self.read_or_spread(argument);
            }
        }
    }

    fn eval_assignment(&mut self, node: Node<'a>, usage: Usage) -> BindingValue {
        let (Some(left), Some(right)) = (node.field("left"), node.field("right")) else {
            return BindingValue::Opaque;
        };
        if node.str_field("operator") != Some("=") {
            self.read(left);
            self.read(right);
            return BindingValue::Opaque;
        }
        // the assigned name carries the value; it is recorded through the name
        let value = self.eval(right, Usage::Bind);
        self.assign_pattern(left, value.clone());
        match usage {
            Usage::Read | Usage::Spread => BindingValue::Opaque,
            Usage::Deref | Usage::Bind => value,
        }
    }

    fn eval_object_literal(&mut self, node: Node<'a>) {
        for property in node.list("properties") {
            if property.is_any(&["SpreadElement", "SpreadProperty"]) {
                self.read_or_spread(property);
                continue;
            }
            if property.bool_field("computed") {
                if let Some(key) = property.field("key") {
                    self.read(key);
                }
            }
            if let Some(value) = property.field("value") {
                self.read(value);
            }
        }
    }

    fn read_or_spread(&mut self, node: Node<'a>) {
        if node.is_any(&["SpreadElement", "SpreadProperty", "JSXSpreadAttribute", "JSXSpreadChild"]) {
            if let Some(argument) = node.field("argument").or_else(|| node.field("expression")) {
                self.spread(argument);
            }
        } else {
            self.read(node);
        }
    }

    fn eval_jsx(&mut self, node: Node<'a>) {
        if let Some(opening) = node.field("openingElement") {
            if let Some(name) = opening.field("name") {
                if name.is("JSXMemberExpression") {
                    self.read_jsx_name(name);
                }
            }
            for attribute in opening.list("attributes") {
                if attribute.is("JSXSpreadAttribute") {
                    self.read_or_spread(attribute);
                } else if let Some(value) = attribute.field("value") {
                    self.read(value);
                }
            }
        }
        for child in node.list("children") {
            match child.kind() {
                "JSXText" => {}
                "JSXSpreadChild" => self.read_or_spread(child),
                _ => self.read(child),
            }
        }
    }

    /// `<this.props.Icon />`
    fn read_jsx_name(&mut self, name: Node<'a>) {
        let value = self.eval_jsx_name(name);
        self.consume(value, Usage::Read, name.location());
    }

    fn eval_jsx_name(&mut self, name: Node<'a>) -> BindingValue {
        match name.kind() {
            "JSXIdentifier" => match name.name() {
                Some("this") => self.scopes.this_value(),
                Some(identifier) => self.scopes.reference(identifier),
                None => BindingValue::Opaque,
            },
            "JSXMemberExpression" => {
                let object = name
                    .field("object")
                    .map_or(BindingValue::Opaque, |object| self.eval_jsx_name(object));
                match name.field("property").and_then(|property| property.name()) {
                    Some(property) => object.member(PathSegment::Key(property.to_string())),
                    None => BindingValue::Opaque,
                }
            }
            _ => BindingValue::Opaque,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn lifecycle_seeds(method_name: Option<&str>) -> Vec<(usize, BindingValue)> {
    match method_name {
        Some(name) if builtins::seeds_props(name) => vec![(0, BindingValue::RootProps)],
        _ => Vec::new(),
    }
}

fn rest_of(value: &BindingValue, named: &[String]) -> BindingValue {
    match value {
        BindingValue::RootProps | BindingValue::PropsPath(_) => BindingValue::RestOf {
            parent: value.as_path().unwrap_or_default(),
            excluded: named.to_vec(),
        },
        BindingValue::RestOf { parent, excluded } => BindingValue::RestOf {
            parent: parent.clone(),
            excluded: excluded.iter().chain(named).cloned().collect(),
        },
        _ => BindingValue::Opaque,
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}
