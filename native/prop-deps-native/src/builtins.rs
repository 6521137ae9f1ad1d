//! Builtin Catalogs
//!
//! Members every value of a primitive kind carries through its prototype.
//! Reading `props.title.length` on a plain `string` prop is not a dependency
//! on a `length` key of the data, so these members are exempted when the shape
//! says the value is an unrefined primitive.

use crate::shape::PrimitiveKind;
use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    pub static ref OBJECT_MEMBERS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("constructor");
        s.insert("hasOwnProperty");
        s.insert("isPrototypeOf");
        s.insert("propertyIsEnumerable");
        s.insert("toLocaleString");
        s.insert("toString");
        s.insert("valueOf");
        s
    };

    pub static ref ARRAY_MEMBERS: HashSet<&'static str> = {
        let mut s: HashSet<&'static str> = OBJECT_MEMBERS.iter().copied().collect();
        for member in [
            "length", "at", "concat", "copyWithin", "entries", "every", "fill", "filter",
            "find", "findIndex", "findLast", "findLastIndex", "flat", "flatMap", "forEach",
            "includes", "indexOf", "join", "keys", "lastIndexOf", "map", "pop", "push",
            "reduce", "reduceRight", "reverse", "shift", "slice", "some", "sort", "splice",
            "toReversed", "toSorted", "toSpliced", "unshift", "values", "with",
        ] {
            s.insert(member);
        }
        s
    };

    pub static ref STRING_MEMBERS: HashSet<&'static str> = {
        let mut s: HashSet<&'static str> = OBJECT_MEMBERS.iter().copied().collect();
        for member in [
            "length", "at", "charAt", "charCodeAt", "codePointAt", "concat", "endsWith",
            "includes", "indexOf", "lastIndexOf", "localeCompare", "match", "matchAll",
            "normalize", "padEnd", "padStart", "repeat", "replace", "replaceAll", "search",
            "slice", "split", "startsWith", "substr", "substring", "toLocaleLowerCase",
            "toLocaleUpperCase", "toLowerCase", "toUpperCase", "trim", "trimEnd",
            "trimStart",
        ] {
            s.insert(member);
        }
        s
    };

    pub static ref NUMBER_MEMBERS: HashSet<&'static str> = {
        let mut s: HashSet<&'static str> = OBJECT_MEMBERS.iter().copied().collect();
        s.insert("toExponential");
        s.insert("toFixed");
        s.insert("toPrecision");
        s
    };

    pub static ref BOOLEAN_MEMBERS: HashSet<&'static str> = OBJECT_MEMBERS.iter().copied().collect();

    pub static ref FUNCTION_MEMBERS: HashSet<&'static str> = {
        let mut s: HashSet<&'static str> = OBJECT_MEMBERS.iter().copied().collect();
        for member in ["apply", "bind", "call", "length", "name"] {
            s.insert(member);
        }
        s
    };

    /// Methods whose first parameter receives the component's data object.
    pub static ref PROPS_LIFECYCLE_METHODS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("constructor");
        s.insert("componentWillReceiveProps");
        s.insert("UNSAFE_componentWillReceiveProps");
        s.insert("shouldComponentUpdate");
        s.insert("componentWillUpdate");
        s.insert("UNSAFE_componentWillUpdate");
        s.insert("componentDidUpdate");
        s.insert("getSnapshotBeforeUpdate");
        s.insert("getDerivedStateFromProps");
        s
    };
}

/// Catalog for a primitive kind. Custom primitives (`instanceOf`, validators,
/// `node`, `element`) have no catalog and are never exempted.
pub fn catalog_for(kind: PrimitiveKind) -> Option<&'static HashSet<&'static str>> {
    match kind {
        PrimitiveKind::String => Some(&*STRING_MEMBERS),
        PrimitiveKind::Number => Some(&*NUMBER_MEMBERS),
        PrimitiveKind::Boolean => Some(&*BOOLEAN_MEMBERS),
        PrimitiveKind::Function => Some(&*FUNCTION_MEMBERS),
        PrimitiveKind::Object => Some(&*OBJECT_MEMBERS),
        PrimitiveKind::Custom => None,
    }
}

pub fn is_builtin_member(kind: PrimitiveKind, member: &str) -> bool {
    catalog_for(kind).is_some_and(|catalog| catalog.contains(member))
}

pub fn is_array_member(member: &str) -> bool {
    ARRAY_MEMBERS.contains(member)
}

pub fn seeds_props(method_name: &str) -> bool {
    PROPS_LIFECYCLE_METHODS.contains(method_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_membership() {
        assert!(is_builtin_member(PrimitiveKind::String, "toLowerCase"));
        assert!(is_builtin_member(PrimitiveKind::Boolean, "toString"));
        assert!(is_builtin_member(PrimitiveKind::Function, "call"));
        assert!(!is_builtin_member(PrimitiveKind::Number, "length"));
        assert!(!is_builtin_member(PrimitiveKind::Custom, "toString"));
        assert!(is_array_member("push"));
        assert!(is_array_member("length"));
        assert!(!is_array_member("render"));
    }

    #[test]
    fn test_lifecycle_names() {
        assert!(seeds_props("componentDidUpdate"));
        assert!(seeds_props("UNSAFE_componentWillReceiveProps"));
        assert!(!seeds_props("render"));
    }
}
