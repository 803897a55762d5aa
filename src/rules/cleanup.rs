//! Cleanup phase: delete the old runner's files

use async_trait::async_trait;

use crate::context::RuleContext;
use crate::error::Result;
use crate::rules::Rule;
use crate::tree::Tree;

/// Deletes one fixed path, guarded by an existence check
pub struct DeleteFile {
    path: &'static str,
}

impl DeleteFile {
    pub fn new(path: &'static str) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Rule for DeleteFile {
    fn name(&self) -> String {
        format!("delete {}", self.path)
    }

    async fn apply(&self, tree: &mut Tree, ctx: &mut RuleContext) -> Result<()> {
        if tree.delete_if_exists(self.path) {
            ctx.summary.deleted_files.push(self.path.to_string());
        }
        Ok(())
    }
}
