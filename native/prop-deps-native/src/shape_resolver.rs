//! Shape Resolver Module for the Prop Dependency Analyzer
//!
//! Lowers a component's declared data shape into a `ShapeNode`. Two dialect
//! families are understood:
//!
//! - **Schema builders**: `{ a: PropTypes.string, b: PropTypes.shape({..}) }`
//!   and friends, recognized by the final member name so `PropTypes.x`,
//!   `React.PropTypes.x` and `T.x` all resolve alike.
//! - **Types**: TypeScript and Flow annotations, aliases and interfaces, with
//!   `extends`, intersections, generics and the common utility types.
//!
//! References are resolved through a `DeclarationContext` built fresh for each
//! component from the file-level declarations the host supplies.

use crate::options::AnalysisOptions;
use crate::shape::{PrimitiveKind, ShapeNode, TypeReference};
use crate::syntax::Node;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Type parameter substitutions in effect while resolving a generic body.
pub type TypeEnv = HashMap<String, ShapeNode>;

// ═══════════════════════════════════════════════════════════════════════════════
// DECLARATION CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

const TYPE_DECLARATIONS: &[&str] = &[
    "TSTypeAliasDeclaration",
    "TSInterfaceDeclaration",
    "TypeAlias",
    "OpaqueType",
    "InterfaceDeclaration",
    "DeclareTypeAlias",
    "DeclareInterface",
];

/// File-level declarations visible to one component, keyed by name.
#[derive(Debug, Default)]
pub struct DeclarationContext<'a> {
    entries: HashMap<String, Vec<Node<'a>>>,
    /// Member assignments (`A.b = ..`) in source order.
    assignments: Vec<(String, Node<'a>)>,
}

impl<'a> DeclarationContext<'a> {
    pub fn from_roots(roots: impl IntoIterator<Item = Node<'a>>) -> Self {
        let mut context = Self::default();
        for root in roots {
            context.register(root);
        }
        context
    }

    pub fn register(&mut self, node: Node<'a>) {
        match node.kind() {
            "Program" | "BlockStatement" | "TSModuleBlock" => {
                for statement in node.list("body") {
                    self.register(statement);
                }
            }
            "ExportNamedDeclaration" | "ExportDefaultDeclaration" | "DeclareExportDeclaration" => {
                if let Some(declaration) = node.field("declaration") {
                    self.register(declaration);
                }
            }
            "VariableDeclaration" => {
                for declarator in node.list("declarations") {
                    if let Some(name) = declarator.field("id").and_then(|id| id.name()) {
                        self.insert(name, declarator);
                    }
                }
            }
            "ExpressionStatement" => {
                // `Component.propTypes = {..}` after the declaration
                let Some(assignment) = node.field("expression") else {
                    return;
                };
                if !assignment.is("AssignmentExpression") {
                    return;
                }
                let target = assignment.field("left").and_then(|left| left.dotted_name());
                if let (Some(target), Some(value)) = (target, assignment.field("right")) {
                    self.insert(&target, value);
                    self.assignments.push((target, value));
                }
            }
            kind if TYPE_DECLARATIONS.contains(&kind)
                || kind == "FunctionDeclaration"
                || kind == "ClassDeclaration" =>
            {
                if let Some(name) = node.field("id").and_then(|id| id.name()) {
                    self.insert(name, node);
                }
            }
            _ => {}
        }
    }

    fn insert(&mut self, name: &str, node: Node<'a>) {
        self.entries.entry(name.to_string()).or_default().push(node);
    }

    pub fn get(&self, name: &str) -> &[Node<'a>] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn assignments(&self) -> &[(String, Node<'a>)] {
        &self.assignments
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.get(name).iter().any(|node| node.is_any(TYPE_DECLARATIONS))
    }

    /// Value-level declaration: the initializer of `const name = ..`, or a
    /// function/class declaration itself.
    pub fn value_of(&self, name: &str) -> Option<Node<'a>> {
        self.get(name).iter().find_map(|node| match node.kind() {
            "VariableDeclarator" => node.field("init"),
            kind if !TYPE_DECLARATIONS.contains(&kind) => Some(*node),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLVER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ShapeResolver<'a> {
    context: DeclarationContext<'a>,
    options: AnalysisOptions,
    cache: RefCell<HashMap<String, ShapeNode>>,
    in_progress: RefCell<Vec<String>>,
}

impl<'a> ShapeResolver<'a> {
    pub fn new(context: DeclarationContext<'a>, options: &AnalysisOptions) -> Self {
        Self {
            context,
            options: options.clone(),
            cache: RefCell::new(HashMap::new()),
            in_progress: RefCell::new(Vec::new()),
        }
    }

    pub fn context(&self) -> &DeclarationContext<'a> {
        &self.context
    }

    /// Entry point: dispatches on the dialect of the declaration node.
    pub fn resolve_declared(&self, node: Node<'a>) -> ShapeNode {
        if is_type_node(node) {
            self.resolve_type(node, &TypeEnv::new())
        } else {
            self.resolve_schema(node)
        }
    }

    /// Folds `Owner.propTypes.a.b = ..` assignments into `root`, creating the
    /// root and intermediate objects they need. Later assignments win.
    pub fn with_assigned_members(&self, owner: &str, root: Option<ShapeNode>) -> Option<ShapeNode> {
        let prefix = format!("{owner}.propTypes.");
        let members: Vec<(Vec<&str>, Node<'a>)> = self
            .context
            .assignments()
            .iter()
            .filter_map(|(target, value)| {
                let rest = target.strip_prefix(&prefix)?;
                Some((rest.split('.').collect(), *value))
            })
            .collect();
        if members.is_empty() {
            return root;
        }
        let mut shape = root.map_or_else(|| ShapeNode::object(IndexMap::new()), |root| self.force(root));
        for (keys, value) in members {
            trace!(owner, member = %keys.join("."), "shape member assigned");
            self.insert_member(&mut shape, &keys, self.resolve_schema(value));
        }
        Some(shape)
    }

    fn insert_member(&self, node: &mut ShapeNode, keys: &[&str], value: ShapeNode) {
        if !matches!(node, ShapeNode::Object { .. }) {
            *node = self.force(node.clone());
        }
        let ShapeNode::Object { children, .. } = node else {
            debug!(?keys, "member assigned below a non-object shape");
            return;
        };
        match keys {
            [] => {}
            [last] => {
                children.insert(last.to_string(), value);
            }
            [first, rest @ ..] => {
                let child = children
                    .entry(first.to_string())
                    .or_insert_with(|| ShapeNode::object(IndexMap::new()));
                self.insert_member(child, rest, value);
            }
        }
    }

    /// Expands deferred references until a concrete node is reached.
    pub fn force(&self, node: ShapeNode) -> ShapeNode {
        let mut current = node;
        let mut seen: Vec<String> = Vec::new();
        loop {
            match current {
                ShapeNode::Deferred(reference) => {
                    if seen.contains(&reference.name) {
                        debug!(name = %reference.name, "type alias cycle; treating as unknown");
                        return ShapeNode::Unknown;
                    }
                    seen.push(reference.name.clone());
                    current = self.expand(&reference);
                }
                concrete => return concrete,
            }
        }
    }

    fn expand(&self, reference: &TypeReference) -> ShapeNode {
        let cacheable = reference.args.is_empty();
        if cacheable {
            if let Some(hit) = self.cache.borrow().get(&reference.name) {
                return hit.clone();
            }
        }
        if self.in_progress.borrow().contains(&reference.name) {
            debug!(name = %reference.name, "recursive declaration; treating as unknown");
            return ShapeNode::Unknown;
        }
        self.in_progress.borrow_mut().push(reference.name.clone());
        let resolved = self.expand_declarations(reference);
        self.in_progress.borrow_mut().pop();

        if cacheable {
            self.cache
                .borrow_mut()
                .insert(reference.name.clone(), resolved.clone());
        }
        resolved
    }

    fn expand_declarations(&self, reference: &TypeReference) -> ShapeNode {
        let mut parts = Vec::new();
        for declaration in self.context.get(&reference.name) {
            let env = bind_type_params(self, *declaration, &reference.args);
            match declaration.kind() {
                "TSTypeAliasDeclaration" => {
                    if let Some(body) = declaration.field("typeAnnotation") {
                        return self.resolve_type(body, &env);
                    }
                }
                "TypeAlias" | "DeclareTypeAlias" => {
                    if let Some(body) = declaration.field("right") {
                        return self.resolve_type(body, &env);
                    }
                }
                "OpaqueType" => {
                    if let Some(body) = declaration.field("impltype") {
                        return self.resolve_type(body, &env);
                    }
                }
                "TSInterfaceDeclaration" | "InterfaceDeclaration" | "DeclareInterface" => {
                    for heritage in declaration.list("extends") {
                        parts.push(self.resolve_heritage(heritage, &env));
                    }
                    if let Some(body) = declaration.field("body") {
                        parts.push(self.resolve_type(body, &env));
                    }
                }
                _ => {}
            }
        }
        if parts.is_empty() {
            debug!(name = %reference.name, "no type declaration found");
            return ShapeNode::Unknown;
        }
        self.merge(parts)
    }

    fn resolve_heritage(&self, heritage: Node<'a>, env: &TypeEnv) -> ShapeNode {
        let target = heritage
            .field("expression")
            .or_else(|| heritage.field("id"));
        let Some(name) = target.and_then(|target| target.dotted_name()) else {
            return ShapeNode::Unknown;
        };
        let args: Vec<Node<'a>> = type_arguments(heritage).collect();
        self.resolve_reference(&name, &args, env)
    }

    /// Merges `extends` parts and intersection members; later parts override
    /// same-named keys. Any part without key information opens the result.
    fn merge(&self, parts: Vec<ShapeNode>) -> ShapeNode {
        let mut children = IndexMap::new();
        let mut open = false;
        for part in parts {
            match self.force(part) {
                ShapeNode::Object {
                    children: part_children,
                    open: part_open,
                } => {
                    children.extend(part_children);
                    open |= part_open;
                }
                _ => open = true,
            }
        }
        ShapeNode::Object { children, open }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Schema-builder dialect
    // ───────────────────────────────────────────────────────────────────────────

    pub fn resolve_schema(&self, node: Node<'a>) -> ShapeNode {
        let node = node.unwrap_expression();
        match node.kind() {
            "ObjectExpression" => self.resolve_schema_object(node),
            "Identifier" => self.resolve_schema_identifier(node),
            "MemberExpression" => self.resolve_schema_member(node),
            "CallExpression" => self.resolve_schema_call(node),
            "FunctionExpression" | "ArrowFunctionExpression" => {
                ShapeNode::Primitive(PrimitiveKind::Custom)
            }
            _ => ShapeNode::Unknown,
        }
    }

    fn resolve_schema_object(&self, node: Node<'a>) -> ShapeNode {
        let mut children = IndexMap::new();
        let mut open = false;
        for property in node.list("properties") {
            match property.kind() {
                "SpreadElement" | "SpreadProperty" | "ExperimentalSpreadProperty" => {
                    let Some(argument) = property.field("argument") else {
                        continue;
                    };
                    match self.resolve_schema(argument) {
                        ShapeNode::Object {
                            children: spread,
                            open: spread_open,
                        } => {
                            children.extend(spread);
                            open |= spread_open;
                        }
                        _ => {
                            trace!(?argument, "unresolved spread in shape declaration");
                            open = true;
                        }
                    }
                }
                _ => match (property.static_key(), property.field("value")) {
                    (Some(key), Some(value)) => {
                        children.insert(key, self.resolve_schema(value));
                    }
                    _ => open = true,
                },
            }
        }
        ShapeNode::Object { children, open }
    }

    fn resolve_schema_identifier(&self, node: Node<'a>) -> ShapeNode {
        let Some(name) = node.name() else {
            return ShapeNode::Unknown;
        };
        if self.is_custom_validator(name) {
            return ShapeNode::Unknown;
        }
        if self.context.has_type(name) {
            return self.force(ShapeNode::Deferred(TypeReference {
                name: name.to_string(),
                args: Vec::new(),
            }));
        }
        let Some(value) = self.context.value_of(name) else {
            debug!(name, "unresolved identifier in shape declaration");
            return ShapeNode::Unknown;
        };
        self.guarded(name, || self.resolve_schema(value))
    }

    fn resolve_schema_member(&self, node: Node<'a>) -> ShapeNode {
        let (Some(object), Some(property)) = (node.field("object"), node.field("property")) else {
            return ShapeNode::Unknown;
        };
        if node.bool_field("computed") {
            return ShapeNode::Unknown;
        }
        let Some(member) = property.name() else {
            return ShapeNode::Unknown;
        };
        if self.is_custom_validator(member) {
            return ShapeNode::Unknown;
        }
        match member {
            "isRequired" => self.resolve_schema(object),
            "string" => ShapeNode::Primitive(PrimitiveKind::String),
            "number" => ShapeNode::Primitive(PrimitiveKind::Number),
            "bool" => ShapeNode::Primitive(PrimitiveKind::Boolean),
            "func" => ShapeNode::Primitive(PrimitiveKind::Function),
            "object" => ShapeNode::Primitive(PrimitiveKind::Object),
            "array" => ShapeNode::array_of(ShapeNode::Unknown),
            "symbol" | "node" | "element" | "elementType" => {
                ShapeNode::Primitive(PrimitiveKind::Custom)
            }
            "any" => ShapeNode::Unknown,
            "propTypes" => {
                // `Other.propTypes` reused from another component
                let Some(owner) = object.dotted_name() else {
                    return ShapeNode::Unknown;
                };
                match self.borrowed_prop_types(&owner) {
                    Some(declaration) => {
                        self.guarded(&format!("{owner}.propTypes"), || {
                            self.resolve_schema(declaration)
                        })
                    }
                    None => ShapeNode::Unknown,
                }
            }
            _ => ShapeNode::Unknown,
        }
    }

    fn borrowed_prop_types(&self, owner: &str) -> Option<Node<'a>> {
        if let Some(assigned) = self.context.get(&format!("{owner}.propTypes")).first() {
            return Some(*assigned);
        }
        let class = self.context.value_of(owner).filter(Node::is_class)?;
        static_prop_types(class)
    }

    fn resolve_schema_call(&self, node: Node<'a>) -> ShapeNode {
        let Some(callee) = node.field("callee").map(Node::unwrap_expression) else {
            return ShapeNode::Unknown;
        };
        let callee_text = callee.dotted_name().unwrap_or_default();
        let callee_name = callee_text.rsplit('.').next().unwrap_or_default();
        let first = node.list("arguments").next();

        if self.is_custom_validator(callee_name) || self.is_custom_validator(&callee_text) {
            return ShapeNode::Unknown;
        }
        if self.options.is_prop_wrapper(&callee_text) {
            return first.map_or(ShapeNode::Unknown, |arg| self.resolve_schema(arg));
        }
        match callee_name {
            "shape" | "exact" => match first.map(|arg| self.resolve_schema(arg)) {
                Some(object @ ShapeNode::Object { .. }) => object,
                _ => ShapeNode::Unknown,
            },
            "arrayOf" => ShapeNode::array_of(
                first.map_or(ShapeNode::Unknown, |arg| self.resolve_schema(arg)),
            ),
            "objectOf" => ShapeNode::record_of(
                first.map_or(ShapeNode::Unknown, |arg| self.resolve_schema(arg)),
            ),
            "oneOfType" => match first.map(Node::unwrap_expression) {
                Some(list) if list.is("ArrayExpression") => ShapeNode::union_of(
                    list.list("elements")
                        .map(|branch| self.resolve_schema(branch))
                        .collect(),
                ),
                _ => ShapeNode::Unknown,
            },
            "oneOf" => ShapeNode::Primitive(infer_literal_kind(first)),
            _ => ShapeNode::Primitive(PrimitiveKind::Custom),
        }
    }

    fn is_custom_validator(&self, name: &str) -> bool {
        self.options.is_custom_validator(name)
    }

    fn guarded(&self, name: &str, resolve: impl FnOnce() -> ShapeNode) -> ShapeNode {
        if self.in_progress.borrow().iter().any(|entry| entry == name) {
            debug!(name, "self-referential shape declaration");
            return ShapeNode::Unknown;
        }
        self.in_progress.borrow_mut().push(name.to_string());
        let resolved = resolve();
        self.in_progress.borrow_mut().pop();
        resolved
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Type dialects (TypeScript, Flow)
    // ───────────────────────────────────────────────────────────────────────────

    pub fn resolve_type(&self, node: Node<'a>, env: &TypeEnv) -> ShapeNode {
        match node.kind() {
            "TSTypeAnnotation" | "TypeAnnotation" | "TSParenthesizedType" | "TSOptionalType"
            | "NullableTypeAnnotation" | "TSRestType" => node
                .field("typeAnnotation")
                .map_or(ShapeNode::Unknown, |inner| self.resolve_type(inner, env)),

            "TSTypeLiteral" => self.resolve_ts_members(node.list("members"), env),
            "TSInterfaceBody" => self.resolve_ts_members(node.list("body"), env),
            "ObjectTypeAnnotation" => self.resolve_flow_object(node, env),

            "TSStringKeyword" | "StringTypeAnnotation" | "StringLiteralTypeAnnotation"
            | "TSTemplateLiteralType" => ShapeNode::Primitive(PrimitiveKind::String),
            "TSNumberKeyword" | "TSBigIntKeyword" | "NumberTypeAnnotation"
            | "NumberLiteralTypeAnnotation" | "BigIntTypeAnnotation" => {
                ShapeNode::Primitive(PrimitiveKind::Number)
            }
            "TSBooleanKeyword" | "BooleanTypeAnnotation" | "BooleanLiteralTypeAnnotation" => {
                ShapeNode::Primitive(PrimitiveKind::Boolean)
            }
            "TSFunctionType" | "TSConstructorType" | "FunctionTypeAnnotation" => {
                ShapeNode::Primitive(PrimitiveKind::Function)
            }
            "TSObjectKeyword" => ShapeNode::Primitive(PrimitiveKind::Object),
            "TSSymbolKeyword" | "SymbolTypeAnnotation" => {
                ShapeNode::Primitive(PrimitiveKind::Custom)
            }
            "TSLiteralType" => match node.field("literal") {
                Some(literal) if literal.string_value().is_some() => {
                    ShapeNode::Primitive(PrimitiveKind::String)
                }
                Some(literal) if literal.numeric_value().is_some() => {
                    ShapeNode::Primitive(PrimitiveKind::Number)
                }
                Some(literal) if literal.raw().get("value").is_some_and(|v| v.is_boolean()) => {
                    ShapeNode::Primitive(PrimitiveKind::Boolean)
                }
                _ => ShapeNode::Unknown,
            },

            "TSArrayType" | "ArrayTypeAnnotation" => ShapeNode::array_of(
                node.field("elementType")
                    .map_or(ShapeNode::Unknown, |element| self.resolve_type(element, env)),
            ),
            "TSTupleType" | "TupleTypeAnnotation" => {
                let members = if node.is("TSTupleType") {
                    node.list("elementTypes")
                } else {
                    node.list("types")
                };
                ShapeNode::array_of(ShapeNode::union_of(
                    members.map(|member| self.resolve_type(member, env)).collect(),
                ))
            }

            "TSUnionType" | "UnionTypeAnnotation" => ShapeNode::union_of(
                node.list("types")
                    .filter(|member| !is_nullish_type(*member))
                    .map(|member| self.resolve_type(member, env))
                    .collect(),
            ),
            "TSIntersectionType" | "IntersectionTypeAnnotation" => self.merge(
                node.list("types")
                    .map(|member| self.resolve_type(member, env))
                    .collect(),
            ),

            "TSTypeReference" | "GenericTypeAnnotation" => {
                let name = node
                    .field("typeName")
                    .or_else(|| node.field("id"))
                    .and_then(|name| name.dotted_name());
                let Some(name) = name else {
                    return ShapeNode::Unknown;
                };
                let args: Vec<Node<'a>> = type_arguments(node).collect();
                self.resolve_reference(&name, &args, env)
            }

            "TSIndexedAccessType" | "IndexedAccessType" => {
                let object = node
                    .field("objectType")
                    .map_or(ShapeNode::Unknown, |object| self.resolve_type(object, env));
                let key = node.field("indexType").and_then(literal_type_key);
                match (self.force(object), key) {
                    (ShapeNode::Object { children, .. }, Some(key)) => {
                        children.get(&key).cloned().unwrap_or(ShapeNode::Unknown)
                    }
                    _ => ShapeNode::Unknown,
                }
            }

            _ => ShapeNode::Unknown,
        }
    }

    fn resolve_ts_members(
        &self,
        members: impl Iterator<Item = Node<'a>>,
        env: &TypeEnv,
    ) -> ShapeNode {
        let mut children = IndexMap::new();
        let mut index_value = None;
        for member in members {
            match member.kind() {
                "TSPropertySignature" => {
                    let Some(key) = member.static_key() else {
                        continue;
                    };
                    let shape = member
                        .field("typeAnnotation")
                        .map_or(ShapeNode::Unknown, |annotation| {
                            self.resolve_type(annotation, env)
                        });
                    children.insert(key, shape);
                }
                "TSMethodSignature" => {
                    if let Some(key) = member.static_key() {
                        children.insert(key, ShapeNode::Primitive(PrimitiveKind::Function));
                    }
                }
                "TSIndexSignature" => {
                    index_value = Some(
                        member
                            .field("typeAnnotation")
                            .map_or(ShapeNode::Unknown, |annotation| {
                                self.resolve_type(annotation, env)
                            }),
                    );
                }
                _ => {}
            }
        }
        object_with_index(children, index_value)
    }

    fn resolve_flow_object(&self, node: Node<'a>, env: &TypeEnv) -> ShapeNode {
        let mut children = IndexMap::new();
        let mut open = false;
        for property in node.list("properties") {
            match property.kind() {
                "ObjectTypeProperty" => {
                    let Some(key) = property.static_key() else {
                        continue;
                    };
                    let shape = if property.bool_field("method") {
                        ShapeNode::Primitive(PrimitiveKind::Function)
                    } else {
                        property
                            .field("value")
                            .map_or(ShapeNode::Unknown, |value| self.resolve_type(value, env))
                    };
                    children.insert(key, shape);
                }
                "ObjectTypeSpreadProperty" => {
                    let spread = property
                        .field("argument")
                        .map_or(ShapeNode::Unknown, |argument| {
                            self.resolve_type(argument, env)
                        });
                    match self.force(spread) {
                        ShapeNode::Object {
                            children: spread,
                            open: spread_open,
                        } => {
                            children.extend(spread);
                            open |= spread_open;
                        }
                        _ => open = true,
                    }
                }
                _ => {}
            }
        }
        let index_value = node.list("indexers").next().map(|indexer| {
            indexer
                .field("value")
                .map_or(ShapeNode::Unknown, |value| self.resolve_type(value, env))
        });
        match object_with_index(children, index_value) {
            ShapeNode::Object {
                children,
                open: indexed,
            } => ShapeNode::Object {
                children,
                open: open || indexed,
            },
            other => other,
        }
    }

    fn resolve_reference(&self, name: &str, args: &[Node<'a>], env: &TypeEnv) -> ShapeNode {
        if args.is_empty() {
            if let Some(bound) = env.get(name) {
                return bound.clone();
            }
        }
        let arg = |index: usize| {
            args.get(index)
                .map_or(ShapeNode::Unknown, |node| self.resolve_type(*node, env))
        };
        let base = name.rsplit('.').next().unwrap_or(name);
        match base {
            "Array" | "ReadonlyArray" | "$ReadOnlyArray" => ShapeNode::array_of(arg(0)),
            "Record" => ShapeNode::record_of(arg(1)),
            "Partial" | "Required" | "Readonly" | "NonNullable" | "$ReadOnly" | "$Exact" => {
                arg(0)
            }
            "Pick" | "Omit" => {
                let keys = args.get(1).map(|keys| literal_type_keys(*keys)).unwrap_or_default();
                match self.force(arg(0)) {
                    ShapeNode::Object { children, open } => {
                        let keep = base == "Pick";
                        let children = children
                            .into_iter()
                            .filter(|(key, _)| keys.contains(key) == keep)
                            .collect();
                        ShapeNode::Object { children, open }
                    }
                    _ => ShapeNode::Unknown,
                }
            }
            "ReturnType" => args
                .first()
                .map_or(ShapeNode::Unknown, |target| self.resolve_return_type(*target, env)),
            _ if self.context.has_type(name) => ShapeNode::Deferred(TypeReference {
                name: name.to_string(),
                args: args.iter().map(|node| self.resolve_type(*node, env)).collect(),
            }),
            _ => {
                debug!(name, "unresolved type reference");
                ShapeNode::Unknown
            }
        }
    }

    /// `ReturnType<T>` for a function type, an alias of one, or
    /// `typeof fn` where `fn` is a declared function.
    fn resolve_return_type(&self, target: Node<'a>, env: &TypeEnv) -> ShapeNode {
        match target.kind() {
            "TSFunctionType" | "FunctionTypeAnnotation" => target
                .field("returnType")
                .map_or(ShapeNode::Unknown, |returned| self.resolve_type(returned, env)),
            "TSTypeQuery" | "TypeofTypeAnnotation" => {
                let name = target
                    .field("exprName")
                    .or_else(|| target.field("argument"))
                    .and_then(|name| name.dotted_name());
                match name.and_then(|name| self.context.value_of(&name)) {
                    Some(function) => self.function_return_shape(function, env),
                    None => ShapeNode::Unknown,
                }
            }
            "TSTypeReference" | "GenericTypeAnnotation" => {
                let alias = target
                    .field("typeName")
                    .or_else(|| target.field("id"))
                    .and_then(|name| name.dotted_name())
                    .and_then(|name| {
                        self.context
                            .get(&name)
                            .iter()
                            .find_map(|decl| decl.field("typeAnnotation").or(decl.field("right")))
                    });
                match alias {
                    Some(body) => self.resolve_return_type(body, env),
                    None => ShapeNode::Unknown,
                }
            }
            _ => ShapeNode::Unknown,
        }
    }

    fn function_return_shape(&self, function: Node<'a>, env: &TypeEnv) -> ShapeNode {
        let function = function.unwrap_expression();
        if !function.is_function() {
            return ShapeNode::Unknown;
        }
        if let Some(annotation) = function.field("returnType") {
            return self.resolve_type(annotation, env);
        }
        let Some(body) = function.field("body") else {
            return ShapeNode::Unknown;
        };
        let returned: Vec<ShapeNode> = if body.is("BlockStatement") {
            body.list("body")
                .filter(|statement| statement.is("ReturnStatement"))
                .filter_map(|statement| statement.field("argument"))
                .map(returned_object_keys)
                .collect()
        } else {
            vec![returned_object_keys(body)]
        };
        ShapeNode::union_of(returned)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn is_type_node(node: Node<'_>) -> bool {
    let kind = node.kind();
    (kind.starts_with("TS") && !matches!(kind, "TSAsExpression" | "TSSatisfiesExpression" | "TSNonNullExpression"))
        || kind.ends_with("TypeAnnotation")
        || kind == "TypeAnnotation"
}

fn is_nullish_type(node: Node<'_>) -> bool {
    node.is_any(&[
        "TSNullKeyword",
        "TSUndefinedKeyword",
        "TSVoidKeyword",
        "NullLiteralTypeAnnotation",
        "VoidTypeAnnotation",
    ])
}

fn type_arguments<'a>(node: Node<'a>) -> impl Iterator<Item = Node<'a>> + 'a {
    node.field("typeArguments")
        .or_else(|| node.field("typeParameters"))
        .into_iter()
        .flat_map(|instantiation| instantiation.list("params"))
}

fn type_param_name<'a>(param: Node<'a>) -> Option<&'a str> {
    param
        .str_field("name")
        .or_else(|| param.field("name").and_then(|name| name.name()))
}

fn bind_type_params<'a>(
    resolver: &ShapeResolver<'a>,
    declaration: Node<'a>,
    args: &[ShapeNode],
) -> TypeEnv {
    let mut env = TypeEnv::new();
    let Some(params) = declaration.field("typeParameters") else {
        return env;
    };
    for (index, param) in params.list("params").enumerate() {
        let Some(name) = type_param_name(param) else {
            continue;
        };
        let bound = match args.get(index) {
            Some(arg) => arg.clone(),
            None => param.field("default").map_or(ShapeNode::Unknown, |default| {
                resolver.resolve_type(default, &env)
            }),
        };
        env.insert(name.to_string(), bound);
    }
    env
}

fn literal_type_key(node: Node<'_>) -> Option<String> {
    match node.kind() {
        "TSLiteralType" => node
            .field("literal")
            .and_then(|literal| literal.string_value())
            .map(str::to_string),
        "StringLiteralTypeAnnotation" => node.str_field("value").map(str::to_string),
        _ => None,
    }
}

/// Keys named by `'a' | 'b'`.
fn literal_type_keys(node: Node<'_>) -> Vec<String> {
    if node.is_any(&["TSUnionType", "UnionTypeAnnotation"]) {
        return node.list("types").filter_map(literal_type_key).collect();
    }
    literal_type_key(node).into_iter().collect()
}

fn object_with_index(children: IndexMap<String, ShapeNode>, index: Option<ShapeNode>) -> ShapeNode {
    match index {
        Some(value) if children.is_empty() => ShapeNode::record_of(value),
        Some(_) => ShapeNode::Object {
            children,
            open: true,
        },
        None => ShapeNode::object(children),
    }
}

/// Keys of an object literal returned by a function; values are unknown.
fn returned_object_keys(returned: Node<'_>) -> ShapeNode {
    let returned = returned.unwrap_expression();
    if !returned.is("ObjectExpression") {
        return ShapeNode::Unknown;
    }
    let mut children = IndexMap::new();
    let mut open = false;
    for property in returned.list("properties") {
        match property.static_key() {
            Some(key) => {
                children.insert(key, ShapeNode::Unknown);
            }
            None => open = true,
        }
    }
    ShapeNode::Object { children, open }
}

fn infer_literal_kind(values: Option<Node<'_>>) -> PrimitiveKind {
    let Some(list) = values.map(Node::unwrap_expression).filter(|list| list.is("ArrayExpression")) else {
        return PrimitiveKind::Custom;
    };
    let mut kinds = list.list("elements").map(|element| {
        if element.string_value().is_some() {
            PrimitiveKind::String
        } else if element.numeric_value().is_some() {
            PrimitiveKind::Number
        } else if element.raw().get("value").is_some_and(|v| v.is_boolean()) {
            PrimitiveKind::Boolean
        } else {
            PrimitiveKind::Custom
        }
    });
    let Some(first) = kinds.next() else {
        return PrimitiveKind::Custom;
    };
    if kinds.all(|kind| kind == first) {
        first
    } else {
        PrimitiveKind::Custom
    }
}

/// `static propTypes = {..}` or `static get propTypes() { return {..} }`.
pub fn static_prop_types(class: Node<'_>) -> Option<Node<'_>> {
    let body = class.field("body")?;
    for member in body.list("body") {
        if !member.bool_field("static") || member.static_key().as_deref() != Some("propTypes") {
            continue;
        }
        match member.kind() {
            "PropertyDefinition" | "ClassProperty" => return member.field("value"),
            "MethodDefinition" if member.str_field("kind") == Some("get") => {
                let function = member.field("value")?;
                return function
                    .field("body")?
                    .list("body")
                    .find(|statement| statement.is("ReturnStatement"))
                    .and_then(|statement| statement.field("argument"));
            }
            _ => {}
        }
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════════
// INLINE SHAPE DISCOVERY
// ═══════════════════════════════════════════════════════════════════════════════

/// Finds a shape declaration carried by the component body itself.
pub fn discover_inline_shape(body: Node<'_>) -> Option<Node<'_>> {
    let body = body.unwrap_expression();
    if body.is_function() {
        let param = body.list("params").next()?;
        let param = if param.is("AssignmentPattern") {
            param.field("left")?
        } else {
            param
        };
        return param.field("typeAnnotation");
    }
    if body.is_class() {
        let class_body = body.field("body")?;
        let props_field = class_body.list("body").find(|member| {
            member.is_any(&["PropertyDefinition", "ClassProperty"])
                && !member.bool_field("static")
                && member.static_key().as_deref() == Some("props")
        });
        if let Some(annotation) = props_field.and_then(|field| field.field("typeAnnotation")) {
            return Some(annotation);
        }
        let super_argument = body
            .field("superTypeArguments")
            .or_else(|| body.field("superTypeParameters"))
            .and_then(|instantiation| instantiation.list("params").next());
        if super_argument.is_some() {
            return super_argument;
        }
        return static_prop_types(body);
    }
    if body.is("CallExpression") {
        return body.list("arguments").next().and_then(discover_inline_shape);
    }
    if body.is("ObjectExpression") {
        return body
            .list("properties")
            .find(|property| property.static_key().as_deref() == Some("propTypes"))
            .and_then(|property| property.field("value"));
    }
    None
}
