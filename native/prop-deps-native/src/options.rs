use serde::{Deserialize, Serialize};

/// Per-component analysis settings. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    /// Root keys excluded from every check.
    pub ignore: Vec<String>,
    /// Skip the declared-shape check when the component declares no shape.
    pub skip_undeclared: bool,
    /// Validators whose declared subtree is never checked.
    pub custom_validator_names: Vec<String>,
    pub check_unused_declared_dependency: bool,
    /// Calls that wrap a schema declaration without changing it
    /// (`forbidExtraProps`, `Object.freeze`).
    pub prop_wrapper_functions: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            skip_undeclared: true,
            custom_validator_names: Vec::new(),
            check_unused_declared_dependency: false,
            prop_wrapper_functions: Vec::new(),
        }
    }
}

impl AnalysisOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn is_ignored(&self, root_key: &str) -> bool {
        self.ignore.iter().any(|key| key == root_key)
    }

    pub fn is_custom_validator(&self, name: &str) -> bool {
        self.custom_validator_names.iter().any(|candidate| candidate == name)
    }

    /// Matches either the full dotted callee (`Object.freeze`) or its last
    /// member (`forbidExtraProps`).
    pub fn is_prop_wrapper(&self, callee: &str) -> bool {
        let last = callee.rsplit('.').next().unwrap_or(callee);
        self.prop_wrapper_functions
            .iter()
            .any(|wrapper| wrapper == callee || wrapper == last)
    }
}
