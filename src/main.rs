//! jestify - Karma to Jest migration for Angular workspaces
//!
//! Removes the Karma test runner's dependencies and config files from a
//! generated Angular CLI workspace and installs Jest in their place, patching
//! package.json, tsconfig.json, src/tsconfig.spec.json and angular.json.

use clap::Parser;
use std::path::PathBuf;

mod cli;
mod commands;
mod context;
mod error;
mod patch;
mod progress;
mod registry;
mod rules;
mod tree;

use cli::{Cli, Commands};
use error::{JestifyError, Result};

/// Check if the workspace directory is within a git repository
///
/// The migration deletes files and rewrites configuration, so it refuses to
/// run against an unversioned workspace unless --force is given.
fn check_git_repository(workspace_path: Option<&PathBuf>) -> Result<()> {
    let start_dir = match workspace_path {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    if git2::Repository::discover(&start_dir).is_err() {
        return Err(JestifyError::NotInGitRepository);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate(args) => {
            if !args.force && !args.dry_run {
                if let Err(e) = check_git_repository(cli.workspace.as_ref()) {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
            commands::migrate::run(cli.workspace, cli.verbose, args).await
        }
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
