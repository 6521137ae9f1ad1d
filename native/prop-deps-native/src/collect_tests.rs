#[cfg(test)]
mod tests {
    use crate::collect::{collect_usage, UsageReport};
    use crate::finding::AnalysisError;
    use crate::options::AnalysisOptions;
    use crate::shape::ShapeTree;
    use crate::shape_resolver::{DeclarationContext, ShapeResolver};
    use crate::syntax::Node;
    use crate::test_support::*;
    use serde_json::{json, Value};

    fn usage(body: &Value, declared: Option<&Value>) -> UsageReport {
        try_usage(body, declared).unwrap()
    }

    fn try_usage(body: &Value, declared: Option<&Value>) -> Result<UsageReport, AnalysisError> {
        let resolver = ShapeResolver::new(DeclarationContext::default(), &AnalysisOptions::default());
        let shape = match declared.and_then(Node::new) {
            Some(declared) => {
                let root = resolver.resolve_declared(declared);
                ShapeTree::new(resolver, root, true)
            }
            None => ShapeTree::undeclared(resolver),
        };
        collect_usage(Node::new(body).unwrap(), &shape)
    }

    fn paths(report: &UsageReport) -> Vec<&str> {
        report.paths().collect()
    }

    fn props_component(statements: Vec<Value>) -> Value {
        function_component(vec![ident("props")], statements)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CANONICAL PATHS
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_element_access_is_canonicalized() {
        let body = props_component(vec![
            stmt(member(computed(chain("props.a"), num(0.0)), "c")),
            stmt(member(computed(chain("props.b"), ident("i")), "c")),
            stmt(member(
                computed(chain("props.b"), binary("+", ident("i"), num(2.0))),
                "c",
            )),
            for_of("item", chain("props.d"), vec![stmt(chain("item.c"))]),
        ]);
        let report = usage(&body, None);
        assert_eq!(paths(&report), vec!["a[].c", "b[].c", "d[].c"]);
    }

    #[test]
    fn test_string_key_on_root_and_dynamic_key_ignored() {
        let body = props_component(vec![
            stmt(computed(ident("props"), ident("key"))),
            stmt(computed(ident("props"), lit("title"))),
        ]);
        assert_eq!(paths(&usage(&body, None)), vec!["title"]);
    }

    #[test]
    fn test_optional_chain() {
        let optional = json!({
            "type": "ChainExpression",
            "expression": member(chain("props.user"), "name")
        });
        let body = props_component(vec![ret(optional)]);
        assert_eq!(paths(&usage(&body, None)), vec!["user.name"]);
    }

    #[test]
    fn test_guard_reads_both_sides() {
        let body = props_component(vec![ret(logical(
            "&&",
            chain("props.show"),
            chain("props.label"),
        ))]);
        assert_eq!(paths(&usage(&body, None)), vec!["show", "label"]);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BINDINGS
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_alias_chain() {
        let body = props_component(vec![
            const_decl(ident("p"), ident("props")),
            const_decl(ident("q"), chain("p.user")),
            ret(chain("q.name")),
        ]);
        assert_eq!(paths(&usage(&body, None)), vec!["user.name"]);
    }

    #[test]
    fn test_unused_destructured_binding_is_recorded() {
        let body = function_component(
            vec![names_pattern(&["firstname", "lastname"], None)],
            vec![ret(ident("firstname"))],
        );
        assert_eq!(paths(&usage(&body, None)), vec!["firstname", "lastname"]);
    }

    #[test]
    fn test_dereferenced_binding_records_only_deeper_path() {
        let body = props_component(vec![
            const_decl(ident("a"), chain("props.a")),
            stmt(chain("a.nope")),
        ]);
        assert_eq!(paths(&usage(&body, None)), vec!["a.nope"]);
    }

    #[test]
    fn test_unused_rest_records_nothing() {
        let declared = object(vec![("name", pt("string"))]);
        let body = function_component(vec![names_pattern(&[], Some("rest"))], vec![ret(lit("x"))]);
        assert!(usage(&body, Some(&declared)).used.is_empty());
    }

    #[test]
    fn test_rest_spread_expands_to_remaining_keys() {
        let declared = object(vec![("name", pt("string")), ("title", pt("string"))]);
        let body = function_component(
            vec![names_pattern(&["name"], Some("rest"))],
            vec![ret(jsx(
                "div",
                vec![jsx_spread(ident("rest"))],
                vec![jsx_expr(ident("name"))],
            ))],
        );
        assert_eq!(paths(&usage(&body, Some(&declared))), vec!["title", "name"]);
    }

    #[test]
    fn test_default_values_keep_paths() {
        let pattern = object_pattern(
            vec![
                ("label", default_value(ident("label"), lit("none"))),
                ("size", default_value(ident("size"), num(10.0))),
            ],
            None,
        );
        let body = function_component(vec![pattern], vec![ret(ident("label"))]);
        assert_eq!(paths(&usage(&body, None)), vec!["label", "size"]);
    }

    #[test]
    fn test_reassignment_records_both_values() {
        let body = props_component(vec![
            let_decl("x"),
            stmt(assign(ident("x"), chain("props.a"))),
            stmt(assign(ident("x"), chain("props.b"))),
            ret(ident("x")),
        ]);
        assert_eq!(paths(&usage(&body, None)), vec!["a", "b"]);
    }

    #[test]
    fn test_shadowed_data_name_is_not_the_data_object() {
        let body = props_component(vec![ret(call(
            chain("props.items.map"),
            vec![arrow(vec![ident("props")], chain("props.x"))],
        ))]);
        assert_eq!(paths(&usage(&body, None)), vec!["items.map"]);
    }

    #[test]
    fn test_computed_key_in_pattern_binds_nothing() {
        let pattern = json!({
            "type": "ObjectPattern",
            "properties": [{
                "type": "Property",
                "kind": "init",
                "computed": true,
                "shorthand": false,
                "key": ident("k"),
                "value": ident("v")
            }]
        });
        let body = props_component(vec![
            const_decl(pattern, ident("props")),
            stmt(call(ident("use"), vec![ident("v")])),
        ]);
        assert!(usage(&body, None).used.is_empty());
    }

    #[test]
    fn test_array_destructuring_uses_element() {
        let body = function_component(
            vec![names_pattern(&["items"], None)],
            vec![
                const_decl(array_pattern(vec![ident("first")]), ident("items")),
                ret(chain("first.id")),
            ],
        );
        assert_eq!(paths(&usage(&body, None)), vec!["items[].id"]);
    }

    #[test]
    fn test_logical_default_keeps_alias() {
        let body = props_component(vec![
            const_decl(ident("items"), logical("||", chain("props.items"), array(vec![]))),
            ret(chain("items.length")),
        ]);
        assert_eq!(paths(&usage(&body, None)), vec!["items.length"]);
    }

    #[test]
    fn test_called_members_are_recorded() {
        let body = function_component(
            vec![names_pattern(&["onClick", "names"], None)],
            vec![
                stmt(call(ident("onClick"), vec![])),
                ret(call(
                    chain("names.map"),
                    vec![arrow(vec![ident("n")], ident("n"))],
                )),
            ],
        );
        assert_eq!(paths(&usage(&body, None)), vec!["onClick", "names.map"]);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EXEMPTIONS AND SPREADS
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_builtin_members_are_exempt() {
        let declared = object(vec![("list", pt("array")), ("label", pt("string"))]);
        let body = props_component(vec![
            stmt(chain("props.list.length")),
            stmt(call(chain("props.label.trim"), vec![])),
        ]);
        let report = usage(&body, Some(&declared));
        assert!(report.used.is_empty());
        assert!(report.exempt.contains("list.length"));
        assert!(report.exempt.contains("label.trim"));
    }

    #[test]
    fn test_members_of_unrefined_values_stay_at_the_parent() {
        let declared = object(vec![("name", pt("object")), ("list", pt("array"))]);
        let body = props_component(vec![
            stmt(chain("props.name.firstname")),
            stmt(chain("props.list.first.id")),
            stmt(chain("props.list.length")),
        ]);
        let report = usage(&body, Some(&declared));
        assert_eq!(paths(&report), vec!["name", "list"]);
        assert!(report.exempt.contains("list.length"));
    }

    #[test]
    fn test_instance_of_members_are_recorded() {
        let declared = object(vec![("a", pt_call("instanceOf", ident("Widget")))]);
        let body = props_component(vec![
            stmt(call(chain("props.a.render"), vec![])),
            stmt(chain("props.a.c")),
        ]);
        assert_eq!(paths(&usage(&body, Some(&declared))), vec!["a.render", "a.c"]);
    }

    #[test]
    fn test_spread_consumes_object() {
        let body = props_component(vec![ret(jsx(
            "div",
            vec![
                jsx_spread(chain("props.style")),
                jsx_attr("color", chain("props.style.color")),
            ],
            vec![],
        ))]);
        let report = usage(&body, None);
        assert!(report.used.is_empty());
        let consumed: Vec<String> = report.consumed.iter().map(ToString::to_string).collect();
        assert_eq!(consumed, vec!["style"]);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CLASS COMPONENTS
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_set_state_updater_receives_props() {
        let updater = arrow(vec![ident("state"), ident("props")], chain("props.step"));
        let body = class_component(vec![method(
            "increment",
            vec![],
            vec![stmt(call(chain("this.setState"), vec![updater]))],
        )]);
        assert_eq!(paths(&usage(&body, None)), vec!["step"]);
    }

    #[test]
    fn test_lifecycle_parameters_are_props() {
        let body = class_component(vec![
            render(chain("this.props.label")),
            method(
                "componentDidUpdate",
                vec![ident("prevProps")],
                vec![stmt(chain("prevProps.value"))],
            ),
            static_method(
                "getDerivedStateFromProps",
                vec![ident("nextProps"), ident("state")],
                vec![ret(chain("nextProps.count"))],
            ),
        ]);
        assert_eq!(paths(&usage(&body, None)), vec!["label", "value", "count"]);
    }

    #[test]
    fn test_nested_class_this_is_not_the_component() {
        let inner = class_component(vec![render(chain("this.props.hidden"))]);
        let body = class_component(vec![method(
            "render",
            vec![],
            vec![inner, ret(chain("this.props.shown"))],
        )]);
        assert_eq!(paths(&usage(&body, None)), vec!["shown"]);
    }

    #[test]
    fn test_create_react_class_definition() {
        let definition = object(vec![(
            "render",
            function_expr(vec![], vec![ret(chain("this.props.title"))]),
        )]);
        let body = call(ident("createReactClass"), vec![definition]);
        assert_eq!(paths(&usage(&body, None)), vec!["title"]);
    }

    #[test]
    fn test_unsupported_body_is_an_error() {
        let result = try_usage(&lit("component"), None);
        assert!(matches!(
            result,
            Err(AnalysisError::UnsupportedComponent { ref kind }) if kind == "Literal"
        ));
    }
}
