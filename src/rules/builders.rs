//! Builder-switch phase: point the workspace test target at the Jest builder

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::context::RuleContext;
use crate::error::Result;
use crate::rules::{ANGULAR_JSON, JEST_BUILDER, Rule};
use crate::tree::Tree;

/// Rewrites the default project's test target in angular.json
///
/// Overwrites `builder` with the Jest builder if one is set, and replaces
/// `options` with an empty map if present: the old runner's options (karma
/// config path and friends) mean nothing to the new builder. Both fields are
/// independently optional; a workspace missing either, or missing the test
/// target entirely, is skipped rather than failed.
pub struct SwitchTestBuilder;

/// Project whose test target gets switched: an explicit `--project` wins,
/// otherwise the workspace's `defaultProject`
fn target_project<'a>(doc: &'a Value, ctx: &'a RuleContext) -> Option<&'a str> {
    ctx.project
        .as_deref()
        .or_else(|| doc.get("defaultProject").and_then(Value::as_str))
}

fn test_target<'a>(doc: &'a mut Value, project: &str) -> Option<&'a mut Value> {
    doc.get_mut("projects")?
        .get_mut(project)?
        .get_mut("architect")?
        .get_mut("test")
}

#[async_trait]
impl Rule for SwitchTestBuilder {
    fn name(&self) -> String {
        format!("switch test builder in {ANGULAR_JSON}")
    }

    async fn apply(&self, tree: &mut Tree, ctx: &mut RuleContext) -> Result<()> {
        if !tree.exists(ANGULAR_JSON) {
            return Ok(());
        }

        let mut doc = tree.read_json(ANGULAR_JSON)?;
        let Some(project) = target_project(&doc, ctx).map(str::to_string) else {
            if ctx.verbose {
                eprintln!("  no default project in {ANGULAR_JSON}, skipping builder switch");
            }
            return Ok(());
        };

        let Some(target) = test_target(&mut doc, &project).and_then(|t| t.as_object_mut()) else {
            if ctx.verbose {
                eprintln!("  project '{project}' has no test target, skipping builder switch");
            }
            return Ok(());
        };

        let mut switched = false;
        if target.contains_key("builder") {
            target.insert("builder".to_string(), json!(JEST_BUILDER));
            switched = true;
        }
        if target.contains_key("options") {
            target.insert("options".to_string(), json!({}));
            switched = true;
        }

        if switched {
            tree.write_json(ANGULAR_JSON, &doc)?;
            ctx.summary.patched_configs.push(ANGULAR_JSON.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryClient;
    use tempfile::TempDir;

    fn tree_with_workspace(doc: &Value) -> (TempDir, Tree) {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("angular.json"), doc.to_string()).unwrap();
        let tree = Tree::new(temp.path());
        (temp, tree)
    }

    fn context_with_project(project: Option<&str>) -> RuleContext {
        RuleContext::new(
            RegistryClient::new(),
            true,
            false,
            project.map(str::to_string),
        )
    }

    fn karma_workspace(project: &str) -> Value {
        json!({
            "defaultProject": project,
            "projects": {
                project: {
                    "architect": {
                        "test": {
                            "builder": "@angular-devkit/build-angular:karma",
                            "options": {"karmaConfig": "src/karma.conf.js", "main": "src/test.ts"}
                        }
                    }
                }
            }
        })
    }

    #[tokio::test]
    async fn test_builder_and_options_replaced() {
        let (_temp, mut tree) = tree_with_workspace(&karma_workspace("app"));
        let mut ctx = context_with_project(None);
        SwitchTestBuilder.apply(&mut tree, &mut ctx).await.unwrap();

        let doc = tree.read_json("angular.json").unwrap();
        let target = &doc["projects"]["app"]["architect"]["test"];
        assert_eq!(target["builder"], JEST_BUILDER);
        assert_eq!(target["options"], json!({}));
    }

    #[tokio::test]
    async fn test_project_flag_overrides_default() {
        let mut doc = karma_workspace("app");
        doc["projects"]["admin"] = doc["projects"]["app"].clone();
        doc["defaultProject"] = json!("app");
        let (_temp, mut tree) = tree_with_workspace(&doc);

        let mut ctx = context_with_project(Some("admin"));
        SwitchTestBuilder.apply(&mut tree, &mut ctx).await.unwrap();

        let doc = tree.read_json("angular.json").unwrap();
        assert_eq!(
            doc["projects"]["admin"]["architect"]["test"]["builder"],
            JEST_BUILDER
        );
        // The default project is left alone
        assert_eq!(
            doc["projects"]["app"]["architect"]["test"]["builder"],
            "@angular-devkit/build-angular:karma"
        );
    }

    #[tokio::test]
    async fn test_missing_workspace_config_skips() {
        let temp = TempDir::new().unwrap();
        let mut tree = Tree::new(temp.path());
        let mut ctx = context_with_project(None);
        SwitchTestBuilder.apply(&mut tree, &mut ctx).await.unwrap();
        assert!(!tree.has_changes());
    }

    #[tokio::test]
    async fn test_missing_test_target_skips() {
        let (_temp, mut tree) = tree_with_workspace(&json!({
            "defaultProject": "app",
            "projects": {"app": {"architect": {"build": {}}}}
        }));
        let mut ctx = context_with_project(None);
        SwitchTestBuilder.apply(&mut tree, &mut ctx).await.unwrap();
        assert!(!tree.has_changes());
    }

    #[tokio::test]
    async fn test_missing_default_project_skips() {
        let (_temp, mut tree) = tree_with_workspace(&json!({"projects": {}}));
        let mut ctx = context_with_project(None);
        SwitchTestBuilder.apply(&mut tree, &mut ctx).await.unwrap();
        assert!(!tree.has_changes());
    }

    #[tokio::test]
    async fn test_target_without_options_only_switches_builder() {
        let (_temp, mut tree) = tree_with_workspace(&json!({
            "defaultProject": "app",
            "projects": {
                "app": {"architect": {"test": {"builder": "@angular-devkit/build-angular:karma"}}}
            }
        }));
        let mut ctx = context_with_project(None);
        SwitchTestBuilder.apply(&mut tree, &mut ctx).await.unwrap();

        let doc = tree.read_json("angular.json").unwrap();
        let target = &doc["projects"]["app"]["architect"]["test"];
        assert_eq!(target["builder"], JEST_BUILDER);
        assert!(target.get("options").is_none());
    }
}
