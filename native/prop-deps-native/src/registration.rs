use crate::differ::Dependency;
use crate::finding::AnalysisError;
use crate::options::AnalysisOptions;
use crate::syntax::{Node, NodeLocation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the host knows about one component: its body, how it declares its
/// data shape, and the dependency list it registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRegistration {
    #[serde(default)]
    pub name: Option<String>,
    /// Function, class, or `createReactClass` definition, as an ESTree node.
    pub body: Value,
    /// Schema object or type annotation. When absent the body is searched.
    #[serde(default)]
    pub declared_shape: Option<Value>,
    /// The dependency-list node, or a plain array of path strings.
    #[serde(default)]
    pub dependencies: Option<Value>,
    /// File-level declarations used to resolve names.
    #[serde(default)]
    pub declarations: Vec<Value>,
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl ComponentRegistration {
    pub fn new(body: Value) -> Self {
        Self {
            name: None,
            body,
            declared_shape: None,
            dependencies: None,
            declarations: Vec::new(),
            options: AnalysisOptions::default(),
        }
    }

    /// Every entry must be a static string; anything else is rejected before
    /// the comparison runs.
    pub fn dependency_list(&self) -> Result<Option<Vec<Dependency>>, AnalysisError> {
        let Some(list) = &self.dependencies else {
            return Ok(None);
        };
        if let Value::Array(entries) = list {
            return entries
                .iter()
                .enumerate()
                .map(|(index, entry)| match entry {
                    Value::String(path) => Ok(Dependency {
                        path: path.clone(),
                        location: NodeLocation::default(),
                    }),
                    other => literal_dependency(index, other),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some);
        }
        let node = Node::new(list)
            .map(Node::unwrap_expression)
            .filter(|node| node.is("ArrayExpression"))
            .ok_or(AnalysisError::DependencyListNotArray)?;
        node.slots("elements")
            .into_iter()
            .enumerate()
            .map(|(index, element)| match element {
                Some(element) => literal_dependency(index, element.raw()),
                None => Err(AnalysisError::NonLiteralDependency {
                    index,
                    location: node.location(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

fn literal_dependency(index: usize, value: &Value) -> Result<Dependency, AnalysisError> {
    let node = Node::new(value).ok_or(AnalysisError::NonLiteralDependency {
        index,
        location: NodeLocation::default(),
    })?;
    match node.string_value() {
        Some(path) => Ok(Dependency {
            path: path.to_string(),
            location: node.location(),
        }),
        None => Err(AnalysisError::NonLiteralDependency {
            index,
            location: node.location(),
        }),
    }
}
