//! The Karma-to-Jest rule chain
//!
//! Each rule is one phase of the migration: it reads from the shared
//! [`Tree`], stages its edits, and records what it did on the
//! [`RuleContext`]. Rules run strictly in order; the only rule that suspends
//! is the dependency rule while it resolves versions. A rule that finds its
//! target file absent skips, which makes re-running the chain over an
//! already-migrated workspace a no-op.
//!
//! - [`cleanup`]: delete the Karma entrypoint and config
//! - [`manifest`]: swap Karma packages for Jest in package.json
//! - [`install`]: schedule `npm install` for after commit
//! - [`tsconfig`]: point the compiler configs at Jest
//! - [`builders`]: switch the workspace test target to the Jest builder

pub mod builders;
pub mod cleanup;
pub mod install;
pub mod manifest;
pub mod tsconfig;

use async_trait::async_trait;

use crate::context::RuleContext;
use crate::error::Result;
use crate::tree::Tree;

pub const PACKAGE_JSON: &str = "package.json";
pub const ANGULAR_JSON: &str = "angular.json";
pub const TSCONFIG_ROOT: &str = "tsconfig.json";
pub const TSCONFIG_SPEC: &str = "src/tsconfig.spec.json";

pub const KARMA_CONFIG: &str = "src/karma.conf.js";
pub const KARMA_ENTRYPOINT: &str = "src/test.ts";

pub const DEV_DEPENDENCIES: &str = "devDependencies";
pub const KARMA_PACKAGES: [&str; 5] = [
    "karma",
    "karma-chrome-launcher",
    "karma-coverage-istanbul-reporter",
    "karma-jasmine",
    "karma-jasmine-html-reporter",
];
pub const JEST_PACKAGES: [&str; 2] = ["jest", "@angular-builders/jest"];

pub const JEST_BUILDER: &str = "@angular-builders/jest:run";

/// One phase of the migration
#[async_trait]
pub trait Rule: Send + Sync {
    fn name(&self) -> String;

    async fn apply(&self, tree: &mut Tree, ctx: &mut RuleContext) -> Result<()>;
}

/// The full migration, in fixed order
pub fn karma_to_jest_chain() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(cleanup::DeleteFile::new(KARMA_CONFIG)),
        Box::new(cleanup::DeleteFile::new(KARMA_ENTRYPOINT)),
        Box::new(manifest::RemovePackages::new(
            DEV_DEPENDENCIES,
            &KARMA_PACKAGES,
        )),
        Box::new(manifest::AddPackages::new(DEV_DEPENDENCIES, &JEST_PACKAGES)),
        Box::new(install::ScheduleInstall),
        Box::new(tsconfig::EditSpecTsConfig::new(TSCONFIG_SPEC)),
        Box::new(tsconfig::EditRootTsConfig::new(TSCONFIG_ROOT)),
        Box::new(builders::SwitchTestBuilder),
    ]
}

/// Run a chain of rules against the tree
pub async fn run_chain(
    rules: &[Box<dyn Rule>],
    tree: &mut Tree,
    ctx: &mut RuleContext,
) -> Result<()> {
    for rule in rules {
        if ctx.verbose {
            eprintln!("  applying: {}", rule.name());
        }
        rule.apply(tree, ctx).await?;
    }
    Ok(())
}
