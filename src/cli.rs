//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// jestify - Karma to Jest migration for Angular workspaces
#[derive(Parser, Debug)]
#[command(
    name = "jestify",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Migrate Angular CLI workspaces from Karma to Jest",
    long_about = "jestify rewrites a generated Angular workspace's testing setup: it removes the \
                  Karma dependencies and config files, installs Jest with versions pinned from \
                  the npm registry, and points tsconfig and angular.json at the Jest builder.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  jestify migrate\n    \
                  jestify migrate --dry-run\n    \
                  jestify migrate --offline --skip-install\n    \
                  jestify migrate --workspace ./my-app --project admin\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/jestify/jestify"
)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(long, short = 'w', global = true)]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate the workspace from Karma to Jest
    Migrate(MigrateArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Preview without touching the workspace:\n    jestify migrate --dry-run\n\n\
                   Migrate without hitting the npm registry:\n    jestify migrate --offline\n\n\
                   Migrate but skip the final npm install:\n    jestify migrate --skip-install\n\n\
                   Migrate a secondary project's test target:\n    jestify migrate --project admin")]
pub struct MigrateArgs {
    /// Report staged changes without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip registry lookups; pin added packages to "latest"
    #[arg(long)]
    pub offline: bool,

    /// Commit file changes but do not run npm install
    #[arg(long)]
    pub skip_install: bool,

    /// Run even when the workspace is not inside a git repository
    #[arg(long)]
    pub force: bool,

    /// Project whose test target is switched (defaults to defaultProject)
    #[arg(long)]
    pub project: Option<String>,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
