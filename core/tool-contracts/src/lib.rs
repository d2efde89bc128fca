//! Catalogue of JSON-Schema-shaped tool contracts, builtin + overrides
//! (spec §4.2).
//!
//! Grounded on the teacher's `core/tools` registry idiom (a name-keyed map
//! behind `&mut self`, aliases tracked in a side set) adapted to the two-tier
//! builtin/override split this component actually needs.

mod error;

pub use error::ToolContractError;
pub use error::Result;

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Value;
use talon_types::ToolContract;

/// Options for [`ToolContractRegistry::register`].
#[derive(Default, Clone, Copy)]
pub struct RegisterOptions {
    pub replace: bool,
}

/// One function-tool definition as surfaced to an LLM.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Options for [`ToolContractRegistry::list_llm_tool_definitions`].
#[derive(Clone, Copy)]
pub struct ListLlmToolDefinitionsOptions {
    pub include_aliases: bool,
}

impl Default for ListLlmToolDefinitionsOptions {
    fn default() -> Self {
        Self { include_aliases: true }
    }
}

#[derive(Default)]
struct Tier {
    contracts: BTreeMap<String, ToolContract>,
    /// alias -> primary name
    aliases: BTreeMap<String, String>,
}

/// Two-layer catalogue: builtins seeded at construction, overrides
/// registered later and preferred on resolve.
#[derive(Default)]
pub struct ToolContractRegistry {
    builtin: Tier,
    overrides: Tier,
}

fn validate(contract: &ToolContract, tier: &Tier, allow_existing: bool) -> Result<()> {
    if contract.name.trim().is_empty() {
        return error::EmptyNameSnafu.fail();
    }
    if contract.description.trim().is_empty() {
        return error::EmptyDescriptionSnafu.fail();
    }
    if !contract.parameters.is_object() {
        return error::ParametersNotObjectSnafu.fail();
    }
    for alias in &contract.aliases {
        if alias == &contract.name {
            return error::AliasCollidesWithNameSnafu { alias: alias.clone() }.fail();
        }
    }
    if !allow_existing && tier.contracts.contains_key(&contract.name) {
        return error::AlreadyRegisteredSnafu { name: contract.name.clone() }.fail();
    }
    Ok(())
}

impl ToolContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contract into the builtin tier. Used at construction time
    /// by hosts seeding default tool catalogues.
    pub fn register_builtin(&mut self, contract: ToolContract) -> Result<()> {
        validate(&contract, &self.builtin, false)?;
        insert(&mut self.builtin, contract);
        Ok(())
    }

    /// Register (or replace) a contract into the override tier, which wins
    /// over builtins at resolve time.
    pub fn register(&mut self, contract: ToolContract, opts: RegisterOptions) -> Result<()> {
        validate(&contract, &self.overrides, opts.replace)?;
        insert(&mut self.overrides, contract);
        Ok(())
    }

    /// Remove an override-tier contract by primary name, along with any
    /// aliases pointing at it. Builtins are never removed this way.
    pub fn unregister(&mut self, name: &str) -> Option<ToolContract> {
        let contract = self.overrides.contracts.remove(name)?;
        self.overrides.aliases.retain(|_, primary| primary != name);
        Some(contract)
    }

    /// Resolve a primary name or alias to a deep clone of its contract,
    /// preferring an override over a builtin, falling back to alias lookup
    /// only once a direct name lookup misses.
    pub fn resolve(&self, name_or_alias: &str) -> Result<ToolContract> {
        for tier in [&self.overrides, &self.builtin] {
            if let Some(contract) = tier.contracts.get(name_or_alias) {
                return Ok(contract.clone());
            }
        }
        for tier in [&self.overrides, &self.builtin] {
            if let Some(primary) = tier.aliases.get(name_or_alias) {
                if let Some(contract) = tier.contracts.get(primary) {
                    return Ok(contract.clone());
                }
            }
        }
        error::NotFoundSnafu { name_or_alias: name_or_alias.to_string() }.fail()
    }

    /// Emit one function-tool definition per primary name, then one per
    /// alias (sharing description/parameters), skipping names already
    /// emitted by an override.
    pub fn list_llm_tool_definitions(
        &self,
        opts: ListLlmToolDefinitionsOptions,
    ) -> Vec<LlmToolDefinition> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();

        for tier in [&self.overrides, &self.builtin] {
            for contract in tier.contracts.values() {
                if seen.insert(contract.name.clone()) {
                    out.push(LlmToolDefinition {
                        name: contract.name.clone(),
                        description: contract.description.clone(),
                        parameters: contract.parameters.clone(),
                    });
                }
            }
        }

        if opts.include_aliases {
            for tier in [&self.overrides, &self.builtin] {
                for contract in tier.contracts.values() {
                    for alias in &contract.aliases {
                        if seen.insert(alias.clone()) {
                            out.push(LlmToolDefinition {
                                name: alias.clone(),
                                description: contract.description.clone(),
                                parameters: contract.parameters.clone(),
                            });
                        }
                    }
                }
            }
        }

        out
    }
}

fn insert(tier: &mut Tier, contract: ToolContract) {
    for alias in &contract.aliases {
        tier.aliases.insert(alias.clone(), contract.name.clone());
    }
    tier.contracts.insert(contract.name.clone(), contract);
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
