//! Tool contract type (spec §3 "ToolContract", §4.2).

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

/// Schema entry in the tool-contract catalogue.
///
/// `parameters` must be an object-typed JSON Schema; `aliases` must never
/// collide with `name` or with each other — enforced by the registry, not
/// by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContract {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub aliases: BTreeSet<String>,
}

impl ToolContract {
    /// `true` if `parameters` is a JSON object (as opposed to any other
    /// JSON value shape).
    pub fn has_object_parameters(&self) -> bool {
        self.parameters.is_object()
    }
}
