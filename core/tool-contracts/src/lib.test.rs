use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use serde_json::json;
use talon_error::ErrorExt;

use super::*;

fn contract(name: &str, aliases: &[&str]) -> ToolContract {
    ToolContract {
        name: name.to_string(),
        description: format!("{name} description"),
        parameters: json!({"type": "object", "properties": {}}),
        aliases: aliases.iter().map(|a| a.to_string()).collect::<BTreeSet<_>>(),
    }
}

#[test]
fn rejects_empty_name() {
    let mut registry = ToolContractRegistry::new();
    let err = registry
        .register(contract("", &[]), RegisterOptions::default())
        .unwrap_err();
    assert_eq!(err.status_code(), talon_error::StatusCode::InvalidArguments);
}

#[test]
fn rejects_non_object_parameters() {
    let mut registry = ToolContractRegistry::new();
    let mut bad = contract("t", &[]);
    bad.parameters = json!("not-an-object");
    assert!(registry.register(bad, RegisterOptions::default()).is_err());
}

#[test]
fn rejects_alias_equal_to_name() {
    let mut registry = ToolContractRegistry::new();
    assert!(
        registry
            .register(contract("t", &["t"]), RegisterOptions::default())
            .is_err()
    );
}

#[test]
fn rejects_duplicate_registration_without_replace() {
    let mut registry = ToolContractRegistry::new();
    registry
        .register(contract("t", &[]), RegisterOptions::default())
        .unwrap_or_else(|e| panic!("register failed: {e}"));
    let err = registry.register(contract("t", &[]), RegisterOptions::default());
    assert!(err.is_err());

    registry
        .register(contract("t", &[]), RegisterOptions { replace: true })
        .unwrap_or_else(|e| panic!("replace failed: {e}"));
}

#[test]
fn resolves_by_name_and_alias() {
    let mut registry = ToolContractRegistry::new();
    registry
        .register(contract("read_file", &["Read"]), RegisterOptions::default())
        .unwrap_or_else(|e| panic!("register failed: {e}"));

    assert_eq!(registry.resolve("read_file").unwrap_or_else(|e| panic!("{e}")).name, "read_file");
    assert_eq!(registry.resolve("Read").unwrap_or_else(|e| panic!("{e}")).name, "read_file");
    assert!(registry.resolve("missing").is_err());
}

#[test]
fn override_shadows_builtin_by_name() {
    let mut registry = ToolContractRegistry::new();
    registry
        .register_builtin(contract("t", &[]))
        .unwrap_or_else(|e| panic!("builtin failed: {e}"));
    let mut overridden = contract("t", &[]);
    overridden.description = "overridden".to_string();
    registry
        .register(overridden, RegisterOptions::default())
        .unwrap_or_else(|e| panic!("override failed: {e}"));

    let resolved = registry.resolve("t").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resolved.description, "overridden");
}

#[test]
fn resolve_returns_independent_clones() {
    let mut registry = ToolContractRegistry::new();
    registry
        .register(contract("t", &[]), RegisterOptions::default())
        .unwrap_or_else(|e| panic!("register failed: {e}"));

    let mut first = registry.resolve("t").unwrap_or_else(|e| panic!("{e}"));
    first.description = "mutated".to_string();

    let second = registry.resolve("t").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(second.description, "t description");
}

#[test]
fn unregister_removes_the_override_and_its_aliases() {
    let mut registry = ToolContractRegistry::new();
    registry
        .register(contract("t", &["alias_t"]), RegisterOptions::default())
        .unwrap_or_else(|e| panic!("register failed: {e}"));

    let removed = registry.unregister("t");
    assert_eq!(removed.map(|c| c.name), Some("t".to_string()));
    assert!(registry.resolve("t").is_err());
    assert!(registry.resolve("alias_t").is_err());
}

#[test]
fn unregister_never_touches_a_builtin() {
    let mut registry = ToolContractRegistry::new();
    registry
        .register_builtin(contract("t", &[]))
        .unwrap_or_else(|e| panic!("builtin failed: {e}"));

    assert!(registry.unregister("t").is_none());
    assert!(registry.resolve("t").is_ok());
}

#[test]
fn lists_primary_names_then_aliases_without_duplicates() {
    let mut registry = ToolContractRegistry::new();
    registry
        .register(contract("a", &["alpha"]), RegisterOptions::default())
        .unwrap_or_else(|e| panic!("register failed: {e}"));
    registry
        .register(contract("b", &[]), RegisterOptions::default())
        .unwrap_or_else(|e| panic!("register failed: {e}"));

    let defs = registry.list_llm_tool_definitions(ListLlmToolDefinitionsOptions::default());
    let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "alpha"]);
}

#[test]
fn aliases_excluded_when_not_requested() {
    let mut registry = ToolContractRegistry::new();
    registry
        .register(contract("a", &["alpha"]), RegisterOptions::default())
        .unwrap_or_else(|e| panic!("register failed: {e}"));

    let defs = registry.list_llm_tool_definitions(ListLlmToolDefinitionsOptions {
        include_aliases: false,
    });
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "a");
}
