//! Dependency phase: edit package.json

use async_trait::async_trait;

use crate::context::RuleContext;
use crate::error::Result;
use crate::patch::{self, PatchOp};
use crate::registry::ResolvedDependency;
use crate::rules::{PACKAGE_JSON, Rule};
use crate::tree::Tree;

/// Removes a fixed list of packages from one dependency category
pub struct RemovePackages {
    category: &'static str,
    packages: &'static [&'static str],
}

impl RemovePackages {
    pub fn new(category: &'static str, packages: &'static [&'static str]) -> Self {
        Self { category, packages }
    }
}

#[async_trait]
impl Rule for RemovePackages {
    fn name(&self) -> String {
        format!("remove {} packages from {}", self.packages.len(), self.category)
    }

    async fn apply(&self, tree: &mut Tree, ctx: &mut RuleContext) -> Result<()> {
        if !tree.exists(PACKAGE_JSON) {
            return Ok(());
        }

        let mut manifest = tree.read_json(PACKAGE_JSON)?;
        let present: Vec<&str> = self
            .packages
            .iter()
            .copied()
            .filter(|pkg| {
                manifest
                    .get(self.category)
                    .and_then(|entries| entries.get(*pkg))
                    .is_some()
            })
            .collect();

        let ops: Vec<PatchOp> = self
            .packages
            .iter()
            .map(|pkg| PatchOp::remove(self.category, pkg))
            .collect();
        patch::apply_patches(&mut manifest, &ops)?;

        for pkg in present {
            ctx.summary.removed_packages.push(pkg.to_string());
        }
        tree.write_json(PACKAGE_JSON, &manifest)
    }
}

/// Adds a fixed list of packages to one dependency category, pinned to the
/// latest published version
///
/// Offline mode skips the registry and pins the fallback version instead.
/// Entries are written unconditionally, so a re-run (or an earlier
/// placeholder) is superseded by whatever resolves now.
pub struct AddPackages {
    category: &'static str,
    packages: &'static [&'static str],
}

impl AddPackages {
    pub fn new(category: &'static str, packages: &'static [&'static str]) -> Self {
        Self { category, packages }
    }

    async fn resolve(&self, ctx: &RuleContext) -> Vec<ResolvedDependency> {
        if ctx.offline {
            return self
                .packages
                .iter()
                .copied()
                .map(ResolvedDependency::fallback)
                .collect();
        }

        let spinner = crate::progress::spinner("Resolving package versions from the npm registry");
        let resolved = ctx.registry().resolve_all(self.packages).await;
        spinner.finish_and_clear();
        resolved
    }
}

#[async_trait]
impl Rule for AddPackages {
    fn name(&self) -> String {
        format!("add {} packages to {}", self.packages.len(), self.category)
    }

    async fn apply(&self, tree: &mut Tree, ctx: &mut RuleContext) -> Result<()> {
        if !tree.exists(PACKAGE_JSON) {
            return Ok(());
        }

        let resolved = self.resolve(ctx).await;

        let mut manifest = tree.read_json(PACKAGE_JSON)?;
        let ops: Vec<PatchOp> = resolved
            .iter()
            .map(|dep| PatchOp::add(self.category, &dep.name, &dep.version))
            .collect();
        patch::apply_patches(&mut manifest, &ops)?;

        ctx.summary.added_packages.extend(resolved);
        tree.write_json(PACKAGE_JSON, &manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryClient;
    use serde_json::json;
    use tempfile::TempDir;

    fn tree_with_manifest(manifest: &serde_json::Value) -> (TempDir, Tree) {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("package.json"), manifest.to_string()).unwrap();
        let tree = Tree::new(temp.path());
        (temp, tree)
    }

    fn offline_context() -> RuleContext {
        RuleContext::new(RegistryClient::new(), true, false, None)
    }

    #[tokio::test]
    async fn test_remove_packages_deletes_listed_entries() {
        let (_temp, mut tree) = tree_with_manifest(&json!({
            "devDependencies": {"karma": "~6.4.0", "karma-jasmine": "~5.1.0", "typescript": "~5.4.0"}
        }));
        let mut ctx = offline_context();
        let rule = RemovePackages::new("devDependencies", &["karma", "karma-jasmine", "karma-chrome-launcher"]);
        rule.apply(&mut tree, &mut ctx).await.unwrap();

        let manifest = tree.read_json("package.json").unwrap();
        assert_eq!(manifest["devDependencies"], json!({"typescript": "~5.4.0"}));
        // Only entries that were actually present end up in the summary
        assert_eq!(ctx.summary.removed_packages, vec!["karma", "karma-jasmine"]);
    }

    #[tokio::test]
    async fn test_remove_packages_without_manifest_skips() {
        let temp = TempDir::new().unwrap();
        let mut tree = Tree::new(temp.path());
        let mut ctx = offline_context();
        let rule = RemovePackages::new("devDependencies", &["karma"]);
        rule.apply(&mut tree, &mut ctx).await.unwrap();
        assert!(!tree.has_changes());
    }

    #[tokio::test]
    async fn test_remove_packages_without_category_is_noop() {
        let (_temp, mut tree) = tree_with_manifest(&json!({"dependencies": {"rxjs": "~7.8.0"}}));
        let mut ctx = offline_context();
        let rule = RemovePackages::new("devDependencies", &["karma"]);
        rule.apply(&mut tree, &mut ctx).await.unwrap();

        let manifest = tree.read_json("package.json").unwrap();
        assert_eq!(manifest, json!({"dependencies": {"rxjs": "~7.8.0"}}));
    }

    #[tokio::test]
    async fn test_add_packages_offline_pins_fallback() {
        let (_temp, mut tree) = tree_with_manifest(&json!({}));
        let mut ctx = offline_context();
        let rule = AddPackages::new("devDependencies", &["jest", "@angular-builders/jest"]);
        rule.apply(&mut tree, &mut ctx).await.unwrap();

        let manifest = tree.read_json("package.json").unwrap();
        assert_eq!(
            manifest["devDependencies"],
            json!({"jest": "latest", "@angular-builders/jest": "latest"})
        );
        // One fallback entry per listed package, in list order
        let added: Vec<(&str, &str)> = ctx
            .summary
            .added_packages
            .iter()
            .map(|dep| (dep.name.as_str(), dep.version.as_str()))
            .collect();
        assert_eq!(
            added,
            vec![
                ("jest", crate::registry::FALLBACK_VERSION),
                ("@angular-builders/jest", crate::registry::FALLBACK_VERSION)
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_packages_malformed_category_fails() {
        let (_temp, mut tree) = tree_with_manifest(&json!({"devDependencies": "oops"}));
        let mut ctx = offline_context();
        let rule = RemovePackages::new("devDependencies", &["karma"]);
        let result = rule.apply(&mut tree, &mut ctx).await;
        assert!(matches!(
            result,
            Err(crate::error::JestifyError::MalformedDocument { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_packages_malformed_category_fails() {
        let (_temp, mut tree) = tree_with_manifest(&json!({"devDependencies": ["not", "a", "map"]}));
        let mut ctx = offline_context();
        let rule = AddPackages::new("devDependencies", &["jest"]);
        let result = rule.apply(&mut tree, &mut ctx).await;
        assert!(matches!(
            result,
            Err(crate::error::JestifyError::MalformedDocument { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_packages_overwrites_existing_entry() {
        let (_temp, mut tree) =
            tree_with_manifest(&json!({"devDependencies": {"jest": "^25.0.0"}}));
        let mut ctx = offline_context();
        let rule = AddPackages::new("devDependencies", &["jest"]);
        rule.apply(&mut tree, &mut ctx).await.unwrap();

        let manifest = tree.read_json("package.json").unwrap();
        assert_eq!(manifest["devDependencies"]["jest"], "latest");
    }

    #[tokio::test]
    async fn test_add_packages_without_manifest_skips() {
        let temp = TempDir::new().unwrap();
        let mut tree = Tree::new(temp.path());
        let mut ctx = offline_context();
        let rule = AddPackages::new("devDependencies", &["jest"]);
        rule.apply(&mut tree, &mut ctx).await.unwrap();
        assert!(!tree.has_changes());
    }
}
