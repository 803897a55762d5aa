//! Install-trigger phase: defer `npm install` until after commit

use async_trait::async_trait;

use crate::context::{RuleContext, ScheduledTask};
use crate::error::Result;
use crate::rules::Rule;
use crate::tree::Tree;

/// Registers a deferred dependency-installation task
///
/// The rule never runs the install itself; the command layer does, and only
/// once the staged file mutations have been committed.
pub struct ScheduleInstall;

#[async_trait]
impl Rule for ScheduleInstall {
    fn name(&self) -> String {
        "schedule npm install".to_string()
    }

    async fn apply(&self, _tree: &mut Tree, ctx: &mut RuleContext) -> Result<()> {
        ctx.add_task(ScheduledTask::NpmInstall);
        Ok(())
    }
}
