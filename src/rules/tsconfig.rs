//! Compiler-config phase: point tsconfig files at Jest

use async_trait::async_trait;
use serde_json::json;

use crate::context::RuleContext;
use crate::error::Result;
use crate::patch::{self, PatchOp};
use crate::rules::Rule;
use crate::tree::Tree;

/// Patches the per-target spec tsconfig (src/tsconfig.spec.json)
///
/// Drops the old runner's `files` entrypoints and sets the ambient types and
/// module format Jest expects.
pub struct EditSpecTsConfig {
    path: &'static str,
}

impl EditSpecTsConfig {
    pub fn new(path: &'static str) -> Self {
        Self { path }
    }

    fn patches() -> Vec<PatchOp> {
        vec![
            PatchOp::remove_if_present(&["files"]),
            PatchOp::set(&["compilerOptions", "types"], json!(["jest", "node"])),
            PatchOp::set(&["compilerOptions", "module"], json!("commonjs")),
        ]
    }
}

#[async_trait]
impl Rule for EditSpecTsConfig {
    fn name(&self) -> String {
        format!("edit {}", self.path)
    }

    async fn apply(&self, tree: &mut Tree, ctx: &mut RuleContext) -> Result<()> {
        if !tree.exists(self.path) {
            return Ok(());
        }

        let mut doc = tree.read_json(self.path)?;
        patch::apply_patches(&mut doc, &Self::patches())?;
        tree.write_json(self.path, &doc)?;
        ctx.summary.patched_configs.push(self.path.to_string());
        Ok(())
    }
}

/// Patches the root tsconfig: exclude spec files and the Jest setup file
/// from the application build.
pub struct EditRootTsConfig {
    path: &'static str,
}

impl EditRootTsConfig {
    pub fn new(path: &'static str) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Rule for EditRootTsConfig {
    fn name(&self) -> String {
        format!("edit {}", self.path)
    }

    async fn apply(&self, tree: &mut Tree, ctx: &mut RuleContext) -> Result<()> {
        if !tree.exists(self.path) {
            return Ok(());
        }

        let mut doc = tree.read_json(self.path)?;
        let patches = [PatchOp::set(
            &["exclude"],
            json!(["**/*.spec.ts", "setup-jest.ts"]),
        )];
        patch::apply_patches(&mut doc, &patches)?;
        tree.write_json(self.path, &doc)?;
        ctx.summary.patched_configs.push(self.path.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryClient;
    use serde_json::Value;
    use tempfile::TempDir;

    fn tree_with(path: &str, doc: &Value) -> (TempDir, Tree) {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(path);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(target, doc.to_string()).unwrap();
        let tree = Tree::new(temp.path());
        (temp, tree)
    }

    fn offline_context() -> RuleContext {
        RuleContext::new(RegistryClient::new(), true, false, None)
    }

    #[tokio::test]
    async fn test_spec_tsconfig_patched_for_jest() {
        let (_temp, mut tree) = tree_with(
            "src/tsconfig.spec.json",
            &json!({
                "extends": "../tsconfig.json",
                "files": ["test.ts", "polyfills.ts"],
                "compilerOptions": {"outDir": "./out-tsc/spec", "types": ["jasmine"]}
            }),
        );
        let mut ctx = offline_context();
        let rule = EditSpecTsConfig::new("src/tsconfig.spec.json");
        rule.apply(&mut tree, &mut ctx).await.unwrap();

        let doc = tree.read_json("src/tsconfig.spec.json").unwrap();
        assert!(doc.get("files").is_none());
        assert_eq!(doc["compilerOptions"]["types"], json!(["jest", "node"]));
        assert_eq!(doc["compilerOptions"]["module"], "commonjs");
        // Fields off the edit path are untouched
        assert_eq!(doc["extends"], "../tsconfig.json");
        assert_eq!(doc["compilerOptions"]["outDir"], "./out-tsc/spec");
    }

    #[tokio::test]
    async fn test_spec_tsconfig_without_compiler_options() {
        let (_temp, mut tree) = tree_with("src/tsconfig.spec.json", &json!({}));
        let mut ctx = offline_context();
        let rule = EditSpecTsConfig::new("src/tsconfig.spec.json");
        rule.apply(&mut tree, &mut ctx).await.unwrap();

        let doc = tree.read_json("src/tsconfig.spec.json").unwrap();
        assert_eq!(doc["compilerOptions"]["types"], json!(["jest", "node"]));
    }

    #[tokio::test]
    async fn test_spec_tsconfig_absent_skips() {
        let temp = TempDir::new().unwrap();
        let mut tree = Tree::new(temp.path());
        let mut ctx = offline_context();
        let rule = EditSpecTsConfig::new("src/tsconfig.spec.json");
        rule.apply(&mut tree, &mut ctx).await.unwrap();
        assert!(!tree.has_changes());
        assert!(ctx.summary.patched_configs.is_empty());
    }

    #[tokio::test]
    async fn test_root_tsconfig_exclude_replaced() {
        let (_temp, mut tree) = tree_with(
            "tsconfig.json",
            &json!({"exclude": ["node_modules"], "compilerOptions": {"target": "es2022"}}),
        );
        let mut ctx = offline_context();
        let rule = EditRootTsConfig::new("tsconfig.json");
        rule.apply(&mut tree, &mut ctx).await.unwrap();

        let doc = tree.read_json("tsconfig.json").unwrap();
        assert_eq!(doc["exclude"], json!(["**/*.spec.ts", "setup-jest.ts"]));
        assert_eq!(doc["compilerOptions"]["target"], "es2022");
    }

    #[tokio::test]
    async fn test_root_tsconfig_without_exclude() {
        let (_temp, mut tree) = tree_with("tsconfig.json", &json!({}));
        let mut ctx = offline_context();
        let rule = EditRootTsConfig::new("tsconfig.json");
        rule.apply(&mut tree, &mut ctx).await.unwrap();

        let doc = tree.read_json("tsconfig.json").unwrap();
        assert_eq!(doc["exclude"], json!(["**/*.spec.ts", "setup-jest.ts"]));
    }
}
