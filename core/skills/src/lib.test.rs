use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::Value;
use talon_host::Result as HostResult;

use super::*;

#[derive(Default)]
struct MemoryKv {
    data: Mutex<HashMap<String, Value>>,
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn kv_get(&self, key: &str) -> HostResult<Option<Value>> {
        Ok(self.data.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned())
    }

    async fn kv_set(&self, key: &str, value: Value) -> HostResult<()> {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), value);
        Ok(())
    }

    async fn kv_remove(&self, key: &str) -> HostResult<()> {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
        Ok(())
    }
}

struct StubReader;

#[async_trait]
impl SkillContentReader for StubReader {
    async fn read_content(&self, location: &str) -> HostResult<String> {
        Ok(format!("body of {location}"))
    }
}

fn registry() -> SkillRegistry {
    SkillRegistry::new(Arc::new(MemoryKv::default()))
}

fn install_input(name: &str, location: &str) -> InstallSkillInput {
    InstallSkillInput {
        id: None,
        name: name.to_string(),
        description: "a skill".to_string(),
        location: location.to_string(),
        source: "builtin".to_string(),
        enabled: None,
        disable_model_invocation: None,
    }
}

#[tokio::test]
async fn install_rejects_empty_location() {
    let reg = registry();
    let err = reg
        .install(install_input("Commit", ""))
        .await
        .expect_err("empty location must be rejected");
    assert_eq!(err.to_string(), "skill location must be non-empty");
}

#[tokio::test]
async fn install_normalises_id_from_name() {
    let reg = registry();
    let meta = reg
        .install(install_input("My Skill!", "skills/my-skill/SKILL.md"))
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(meta.id, "my-skill");
    assert!(meta.enabled);
}

#[tokio::test]
async fn install_upserts_existing_id_and_keeps_created_at() {
    let reg = registry();
    let first = reg
        .install(install_input("Commit", "skills/commit/SKILL.md"))
        .await
        .unwrap_or_else(|e| panic!("{e}"));

    let mut update = install_input("Commit", "skills/commit/v2/SKILL.md");
    update.description = "updated".to_string();
    let second = reg.install(update).await.unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.location, "skills/commit/v2/SKILL.md");
    assert_eq!(second.description, "updated");
}

#[tokio::test]
async fn enable_disable_round_trip() {
    let reg = registry();
    let meta = reg
        .install(install_input("Commit", "skills/commit/SKILL.md"))
        .await
        .unwrap_or_else(|e| panic!("{e}"));

    let disabled = reg.disable(&meta.id).await.unwrap_or_else(|e| panic!("{e}"));
    assert!(!disabled.enabled);

    let enabled = reg.enable(&meta.id).await.unwrap_or_else(|e| panic!("{e}"));
    assert!(enabled.enabled);
}

#[tokio::test]
async fn enable_unknown_id_is_not_found() {
    let reg = registry();
    assert!(reg.enable("missing").await.is_err());
}

#[tokio::test]
async fn uninstall_removes_the_entry() {
    let reg = registry();
    let meta = reg
        .install(install_input("Commit", "skills/commit/SKILL.md"))
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    reg.uninstall(&meta.id).await.unwrap_or_else(|e| panic!("{e}"));
    assert!(reg.get(&meta.id).await.unwrap_or_else(|e| panic!("{e}")).is_none());
    assert!(reg.uninstall(&meta.id).await.is_err());
}

#[tokio::test]
async fn list_is_sorted_by_name_then_id() {
    let reg = registry();
    reg.install(install_input("Zebra", "skills/zebra/SKILL.md")).await.unwrap_or_else(|e| panic!("{e}"));
    reg.install(install_input("Alpha", "skills/alpha/SKILL.md")).await.unwrap_or_else(|e| panic!("{e}"));
    reg.install(install_input("Alpha", "skills/alpha-2/SKILL.md")).await.unwrap_or_else(|e| panic!("{e}"));

    let names: Vec<String> = reg.list().await.unwrap_or_else(|e| panic!("{e}")).into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["Alpha", "Zebra"]);
}

#[tokio::test]
async fn resolve_content_builds_the_prompt_block() {
    let reg = registry();
    let meta = reg
        .install(install_input("Commit", "skills/commit/SKILL.md"))
        .await
        .unwrap_or_else(|e| panic!("{e}"));

    let block = reg
        .resolve_content(&StubReader, &meta.id, false)
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        block,
        "<skill id=\"commit\" name=\"Commit\" location=\"skills/commit/SKILL.md\">\nbody of skills/commit/SKILL.md\n</skill>"
    );
}

#[tokio::test]
async fn resolve_content_rejects_disabled_skill_unless_allowed() {
    let reg = registry();
    let meta = reg
        .install(install_input("Commit", "skills/commit/SKILL.md"))
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    reg.disable(&meta.id).await.unwrap_or_else(|e| panic!("{e}"));

    let err = reg
        .resolve_content(&StubReader, &meta.id, false)
        .await
        .expect_err("disabled skill must fail without allow_disabled");
    assert_eq!(err.to_string(), "skill 未启用");

    let ok = reg.resolve_content(&StubReader, &meta.id, true).await;
    assert!(ok.is_ok());
}
