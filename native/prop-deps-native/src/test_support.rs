//! ESTree fixture builders shared by the test modules.

use serde_json::{json, Value};

// ───────────────────────────────────────────────────────────────────────────────
// Expressions
// ───────────────────────────────────────────────────────────────────────────────

pub fn ident(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

pub fn this() -> Value {
    json!({ "type": "ThisExpression" })
}

pub fn lit(value: &str) -> Value {
    json!({ "type": "Literal", "value": value })
}

pub fn num(value: f64) -> Value {
    json!({ "type": "Literal", "value": value })
}

pub fn member(object: Value, property: &str) -> Value {
    json!({
        "type": "MemberExpression",
        "computed": false,
        "object": object,
        "property": ident(property)
    })
}

/// `a.b.c` from a dotted chain; a leading `this` becomes `ThisExpression`.
pub fn chain(dotted: &str) -> Value {
    let mut parts = dotted.split('.');
    let first = parts.next().unwrap_or_default();
    let mut node = if first == "this" { this() } else { ident(first) };
    for part in parts {
        node = member(node, part);
    }
    node
}

pub fn computed(object: Value, property: Value) -> Value {
    json!({
        "type": "MemberExpression",
        "computed": true,
        "object": object,
        "property": property
    })
}

pub fn call(callee: Value, arguments: Vec<Value>) -> Value {
    json!({ "type": "CallExpression", "callee": callee, "arguments": arguments })
}

pub fn binary(operator: &str, left: Value, right: Value) -> Value {
    json!({ "type": "BinaryExpression", "operator": operator, "left": left, "right": right })
}

pub fn logical(operator: &str, left: Value, right: Value) -> Value {
    json!({ "type": "LogicalExpression", "operator": operator, "left": left, "right": right })
}

pub fn conditional(test: Value, consequent: Value, alternate: Value) -> Value {
    json!({
        "type": "ConditionalExpression",
        "test": test,
        "consequent": consequent,
        "alternate": alternate
    })
}

pub fn assign(left: Value, right: Value) -> Value {
    json!({ "type": "AssignmentExpression", "operator": "=", "left": left, "right": right })
}

pub fn arrow(params: Vec<Value>, body: Value) -> Value {
    let expression = body.get("type").and_then(Value::as_str) != Some("BlockStatement");
    json!({
        "type": "ArrowFunctionExpression",
        "params": params,
        "body": body,
        "expression": expression
    })
}

pub fn function_expr(params: Vec<Value>, statements: Vec<Value>) -> Value {
    json!({
        "type": "FunctionExpression",
        "id": null,
        "params": params,
        "body": block(statements)
    })
}

pub fn object(properties: Vec<(&str, Value)>) -> Value {
    let properties: Vec<Value> = properties
        .into_iter()
        .map(|(key, value)| property(key, value))
        .collect();
    json!({ "type": "ObjectExpression", "properties": properties })
}

pub fn object_with(properties: Vec<Value>) -> Value {
    json!({ "type": "ObjectExpression", "properties": properties })
}

pub fn property(key: &str, value: Value) -> Value {
    json!({
        "type": "Property",
        "kind": "init",
        "computed": false,
        "shorthand": false,
        "key": ident(key),
        "value": value
    })
}

pub fn spread(argument: Value) -> Value {
    json!({ "type": "SpreadElement", "argument": argument })
}

pub fn array(elements: Vec<Value>) -> Value {
    json!({ "type": "ArrayExpression", "elements": elements })
}

// ───────────────────────────────────────────────────────────────────────────────
// Patterns
// ───────────────────────────────────────────────────────────────────────────────

/// `{ a, b: c, ...rest }` from `("a", "a")`, `("b", "c")` and a rest name.
pub fn object_pattern(bindings: Vec<(&str, Value)>, rest: Option<&str>) -> Value {
    let mut properties: Vec<Value> = bindings
        .into_iter()
        .map(|(key, target)| property(key, target))
        .collect();
    if let Some(rest) = rest {
        properties.push(json!({ "type": "RestElement", "argument": ident(rest) }));
    }
    json!({ "type": "ObjectPattern", "properties": properties })
}

pub fn shorthand(names: &[&str]) -> Vec<(String, Value)> {
    names.iter().map(|name| (name.to_string(), ident(name))).collect()
}

pub fn names_pattern(names: &[&str], rest: Option<&str>) -> Value {
    let bindings = shorthand(names);
    object_pattern(
        bindings
            .iter()
            .map(|(key, target)| (key.as_str(), target.clone()))
            .collect(),
        rest,
    )
}

pub fn array_pattern(elements: Vec<Value>) -> Value {
    json!({ "type": "ArrayPattern", "elements": elements })
}

pub fn default_value(left: Value, right: Value) -> Value {
    json!({ "type": "AssignmentPattern", "left": left, "right": right })
}

// ───────────────────────────────────────────────────────────────────────────────
// Statements
// ───────────────────────────────────────────────────────────────────────────────

pub fn block(statements: Vec<Value>) -> Value {
    json!({ "type": "BlockStatement", "body": statements })
}

pub fn ret(argument: Value) -> Value {
    json!({ "type": "ReturnStatement", "argument": argument })
}

pub fn stmt(expression: Value) -> Value {
    json!({ "type": "ExpressionStatement", "expression": expression })
}

pub fn const_decl(id: Value, init: Value) -> Value {
    json!({
        "type": "VariableDeclaration",
        "kind": "const",
        "declarations": [{ "type": "VariableDeclarator", "id": id, "init": init }]
    })
}

pub fn let_decl(name: &str) -> Value {
    json!({
        "type": "VariableDeclaration",
        "kind": "let",
        "declarations": [{ "type": "VariableDeclarator", "id": ident(name), "init": null }]
    })
}

pub fn if_stmt(test: Value, consequent: Value, alternate: Option<Value>) -> Value {
    json!({
        "type": "IfStatement",
        "test": test,
        "consequent": consequent,
        "alternate": alternate
    })
}

pub fn for_of(name: &str, right: Value, body: Vec<Value>) -> Value {
    json!({
        "type": "ForOfStatement",
        "left": {
            "type": "VariableDeclaration",
            "kind": "const",
            "declarations": [{ "type": "VariableDeclarator", "id": ident(name), "init": null }]
        },
        "right": right,
        "body": block(body)
    })
}

// ───────────────────────────────────────────────────────────────────────────────
// JSX
// ───────────────────────────────────────────────────────────────────────────────

pub fn jsx(name: &str, attributes: Vec<Value>, children: Vec<Value>) -> Value {
    let self_closing = children.is_empty();
    json!({
        "type": "JSXElement",
        "openingElement": {
            "type": "JSXOpeningElement",
            "name": { "type": "JSXIdentifier", "name": name },
            "attributes": attributes,
            "selfClosing": self_closing
        },
        "closingElement": null,
        "children": children
    })
}

pub fn jsx_attr(name: &str, expression: Value) -> Value {
    json!({
        "type": "JSXAttribute",
        "name": { "type": "JSXIdentifier", "name": name },
        "value": jsx_expr(expression)
    })
}

pub fn jsx_spread(argument: Value) -> Value {
    json!({ "type": "JSXSpreadAttribute", "argument": argument })
}

pub fn jsx_expr(expression: Value) -> Value {
    json!({ "type": "JSXExpressionContainer", "expression": expression })
}

// ───────────────────────────────────────────────────────────────────────────────
// Components
// ───────────────────────────────────────────────────────────────────────────────

pub fn function_component(params: Vec<Value>, statements: Vec<Value>) -> Value {
    json!({
        "type": "FunctionDeclaration",
        "id": ident("Component"),
        "params": params,
        "body": block(statements)
    })
}

pub fn class_component(members: Vec<Value>) -> Value {
    json!({
        "type": "ClassDeclaration",
        "id": ident("Component"),
        "superClass": chain("React.Component"),
        "body": { "type": "ClassBody", "body": members }
    })
}

pub fn method(name: &str, params: Vec<Value>, statements: Vec<Value>) -> Value {
    json!({
        "type": "MethodDefinition",
        "kind": if name == "constructor" { "constructor" } else { "method" },
        "static": false,
        "computed": false,
        "key": ident(name),
        "value": function_expr(params, statements)
    })
}

pub fn static_method(name: &str, params: Vec<Value>, statements: Vec<Value>) -> Value {
    let mut definition = method(name, params, statements);
    definition["static"] = json!(true);
    definition
}

pub fn class_field(name: &str, value: Value, is_static: bool) -> Value {
    json!({
        "type": "PropertyDefinition",
        "static": is_static,
        "computed": false,
        "key": ident(name),
        "value": value
    })
}

/// `render() { return <expr>; }`
pub fn render(expression: Value) -> Value {
    method("render", vec![], vec![ret(expression)])
}

// ───────────────────────────────────────────────────────────────────────────────
// Shapes
// ───────────────────────────────────────────────────────────────────────────────

/// `PropTypes.<name>`, or `PropTypes.<name>.isRequired` when the name ends with `!`.
pub fn pt(name: &str) -> Value {
    match name.strip_suffix('!') {
        Some(base) => member(member(ident("PropTypes"), base), "isRequired"),
        None => member(ident("PropTypes"), name),
    }
}

pub fn pt_call(name: &str, argument: Value) -> Value {
    call(member(ident("PropTypes"), name), vec![argument])
}

pub fn ts_keyword(keyword: &str) -> Value {
    let kind = match keyword {
        "string" => "TSStringKeyword",
        "number" => "TSNumberKeyword",
        "boolean" => "TSBooleanKeyword",
        "any" => "TSAnyKeyword",
        "null" => "TSNullKeyword",
        _ => "TSUnknownKeyword",
    };
    json!({ "type": kind })
}

pub fn ts_annotation(ty: Value) -> Value {
    json!({ "type": "TSTypeAnnotation", "typeAnnotation": ty })
}

pub fn ts_prop(key: &str, ty: Value) -> Value {
    json!({
        "type": "TSPropertySignature",
        "computed": false,
        "key": ident(key),
        "typeAnnotation": ts_annotation(ty)
    })
}

pub fn ts_literal(members: Vec<(&str, Value)>) -> Value {
    let members: Vec<Value> = members.into_iter().map(|(key, ty)| ts_prop(key, ty)).collect();
    json!({ "type": "TSTypeLiteral", "members": members })
}

pub fn ts_ref(name: &str, args: Vec<Value>) -> Value {
    if args.is_empty() {
        return json!({ "type": "TSTypeReference", "typeName": ident(name) });
    }
    json!({
        "type": "TSTypeReference",
        "typeName": ident(name),
        "typeArguments": { "type": "TSTypeParameterInstantiation", "params": args }
    })
}

pub fn ts_array(element: Value) -> Value {
    json!({ "type": "TSArrayType", "elementType": element })
}

pub fn ts_union(types: Vec<Value>) -> Value {
    json!({ "type": "TSUnionType", "types": types })
}

pub fn ts_intersection(types: Vec<Value>) -> Value {
    json!({ "type": "TSIntersectionType", "types": types })
}

pub fn ts_alias(name: &str, params: &[&str], ty: Value) -> Value {
    let params: Vec<Value> = params
        .iter()
        .map(|param| json!({ "type": "TSTypeParameter", "name": ident(param) }))
        .collect();
    json!({
        "type": "TSTypeAliasDeclaration",
        "id": ident(name),
        "typeParameters": { "type": "TSTypeParameterDeclaration", "params": params },
        "typeAnnotation": ty
    })
}

pub fn ts_interface(name: &str, extends: &[&str], members: Vec<(&str, Value)>) -> Value {
    let extends: Vec<Value> = extends
        .iter()
        .map(|parent| json!({ "type": "TSInterfaceHeritage", "expression": ident(parent) }))
        .collect();
    let body: Vec<Value> = members.into_iter().map(|(key, ty)| ts_prop(key, ty)).collect();
    json!({
        "type": "TSInterfaceDeclaration",
        "id": ident(name),
        "extends": extends,
        "body": { "type": "TSInterfaceBody", "body": body }
    })
}

/// `const <name> = <init>;` as a file-level declaration.
pub fn declare_const(name: &str, init: Value) -> Value {
    const_decl(ident(name), init)
}

/// Attaches `range` so locations are distinguishable.
pub fn at(mut node: Value, start: u32, end: u32) -> Value {
    node["range"] = json!([start, end]);
    node
}
