//! Execution context threaded through every migration rule
//!
//! Rules never own the scheduler or the terminal: they register deferred work
//! and record what they did on the context, and the command layer decides what
//! to do with both after the tree commits. Passed explicitly to each rule,
//! never a module-level singleton.

use crate::registry::{RegistryClient, ResolvedDependency};

/// Side-effecting work a rule wants run after the file mutations commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    NpmInstall,
}

/// What the migration changed, for the end-of-run report
#[derive(Debug, Default)]
pub struct MigrationSummary {
    pub deleted_files: Vec<String>,
    pub removed_packages: Vec<String>,
    pub added_packages: Vec<ResolvedDependency>,
    pub patched_configs: Vec<String>,
}

impl MigrationSummary {
    pub fn is_empty(&self) -> bool {
        self.deleted_files.is_empty()
            && self.removed_packages.is_empty()
            && self.added_packages.is_empty()
            && self.patched_configs.is_empty()
    }
}

/// Context passed through every rule in the chain
pub struct RuleContext {
    /// Skip registry lookups and pin added packages to the fallback version
    pub offline: bool,
    pub verbose: bool,
    /// Overrides `defaultProject` when switching the test builder
    pub project: Option<String>,
    pub summary: MigrationSummary,
    registry: RegistryClient,
    tasks: Vec<ScheduledTask>,
}

impl RuleContext {
    pub fn new(registry: RegistryClient, offline: bool, verbose: bool, project: Option<String>) -> Self {
        Self {
            offline,
            verbose,
            project,
            summary: MigrationSummary::default(),
            registry,
            tasks: Vec::new(),
        }
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Register deferred work; the command layer runs it after commit
    pub fn add_task(&mut self, task: ScheduledTask) {
        if !self.tasks.contains(&task) {
            self.tasks.push(task);
        }
    }

    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }
}
