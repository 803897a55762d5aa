//! Migrate command implementation
//!
//! The migration process:
//! 1. Run the rule chain against an in-memory tree overlay
//! 2. On --dry-run, report the staged changes and stop
//! 3. Commit the overlay to disk
//! 4. Run the deferred tasks the rules registered (npm install)

use std::path::{Path, PathBuf};
use std::process::Command;

use console::Style;

use crate::cli::MigrateArgs;
use crate::context::{RuleContext, ScheduledTask};
use crate::error::{JestifyError, Result};
use crate::registry::RegistryClient;
use crate::rules;
use crate::tree::{Change, Tree};

/// Run the migrate command
pub async fn run(workspace: Option<PathBuf>, verbose: bool, args: MigrateArgs) -> Result<()> {
    let root = match workspace {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let mut tree = Tree::new(&root);
    let mut ctx = RuleContext::new(
        RegistryClient::new(),
        args.offline,
        verbose,
        args.project.clone(),
    );

    let chain = rules::karma_to_jest_chain();
    rules::run_chain(&chain, &mut tree, &mut ctx).await?;

    if args.dry_run {
        report_staged_changes(&tree);
        return Ok(());
    }

    tree.commit()?;
    report_summary(&ctx);

    if !args.skip_install {
        for task in ctx.tasks() {
            match task {
                ScheduledTask::NpmInstall => run_npm_install(&root)?,
            }
        }
    }

    Ok(())
}

fn report_staged_changes(tree: &Tree) {
    let bold = Style::new().bold();
    if !tree.has_changes() {
        println!("Nothing to migrate.");
        return;
    }
    println!("{}", bold.apply_to("Dry run, would apply:"));
    for (path, change) in tree.changes() {
        match change {
            Change::Delete => println!("  {} {}", Style::new().red().apply_to("delete"), path),
            Change::Overwrite(_) => {
                println!("  {} {}", Style::new().yellow().apply_to("rewrite"), path);
            }
        }
    }
}

fn report_summary(ctx: &RuleContext) {
    let bold = Style::new().bold();
    let summary = &ctx.summary;

    if summary.is_empty() {
        println!("Nothing to migrate, workspace already looks Jest-ready.");
        return;
    }

    println!("{}", Style::new().green().bold().apply_to("Migrated to Jest"));
    if !summary.deleted_files.is_empty() {
        println!("{}", bold.apply_to("Deleted:"));
        for path in &summary.deleted_files {
            println!("  {path}");
        }
    }
    if !summary.removed_packages.is_empty() {
        println!("{}", bold.apply_to("Removed packages:"));
        for name in &summary.removed_packages {
            println!("  {name}");
        }
    }
    if !summary.added_packages.is_empty() {
        println!("{}", bold.apply_to("Added packages:"));
        for dep in &summary.added_packages {
            println!("  {} {}", dep.name, dep.version);
        }
    }
    if !summary.patched_configs.is_empty() {
        println!("{}", bold.apply_to("Patched:"));
        for path in &summary.patched_configs {
            println!("  {path}");
        }
    }
}

fn run_npm_install(root: &Path) -> Result<()> {
    let spinner = crate::progress::spinner("Running npm install");
    let status = Command::new("npm")
        .arg("install")
        .current_dir(root)
        .status()
        .map_err(|e| JestifyError::InstallFailed {
            reason: e.to_string(),
        })?;
    spinner.finish_and_clear();

    if !status.success() {
        return Err(JestifyError::InstallFailed {
            reason: status.to_string(),
        });
    }
    println!("Installed dependencies.");
    Ok(())
}
