//! In-memory overlay over the workspace file tree
//!
//! Migration rules read and stage edits against a [`Tree`]; nothing touches
//! disk until [`Tree::commit`] runs. Aborting mid-chain therefore leaves the
//! workspace exactly as it was.
//!
//! Paths are workspace-relative, slash-separated strings ("src/test.ts").

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Result, config_parse_failed, file_not_found, file_read_failed};
use crate::error::{JestifyError, file_write_failed};

/// A staged, not-yet-committed change to one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Overwrite(String),
    Delete,
}

/// Workspace file tree with staged changes layered over the on-disk state
#[derive(Debug)]
pub struct Tree {
    root: PathBuf,
    staged: BTreeMap<String, Change>,
}

impl Tree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            staged: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn disk_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Check whether a path exists, staged state first, then disk
    pub fn exists(&self, path: &str) -> bool {
        match self.staged.get(path) {
            Some(Change::Overwrite(_)) => true,
            Some(Change::Delete) => false,
            None => self.disk_path(path).is_file(),
        }
    }

    /// Read a file as UTF-8 text
    ///
    /// Fails rather than returning an empty string when the host yields no
    /// content, so callers can tell "absent" from "empty".
    pub fn read_utf8(&self, path: &str) -> Result<String> {
        match self.staged.get(path) {
            Some(Change::Overwrite(content)) => Ok(content.clone()),
            Some(Change::Delete) => Err(file_not_found(path)),
            None => std::fs::read_to_string(self.disk_path(path)).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    file_not_found(path)
                } else {
                    file_read_failed(path, e.to_string())
                }
            }),
        }
    }

    /// Stage an overwrite of a path with new content
    pub fn overwrite(&mut self, path: &str, content: String) {
        self.staged.insert(path.to_string(), Change::Overwrite(content));
    }

    /// Stage a delete, guarded by an existence check
    ///
    /// Returns whether a delete was actually staged. Absent paths are a no-op,
    /// which keeps re-runs over a half-migrated workspace from failing.
    pub fn delete_if_exists(&mut self, path: &str) -> bool {
        if !self.exists(path) {
            return false;
        }
        self.staged.insert(path.to_string(), Change::Delete);
        true
    }

    /// Read and parse a JSON configuration file
    pub fn read_json(&self, path: &str) -> Result<Value> {
        let text = self.read_utf8(path)?;
        serde_json::from_str(&text).map_err(|e| config_parse_failed(path, e.to_string()))
    }

    /// Serialize a JSON document and stage it as an overwrite
    ///
    /// Pretty-printed with two-space indentation, trailing newline.
    pub fn write_json(&mut self, path: &str, doc: &Value) -> Result<()> {
        let text = serde_json::to_string_pretty(doc)
            .map_err(|e| file_write_failed(path, e.to_string()))?;
        self.overwrite(path, format!("{text}\n"));
        Ok(())
    }

    /// Staged changes in path order, for dry-run reporting
    pub fn changes(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.staged.iter().map(|(p, c)| (p.as_str(), c))
    }

    pub fn has_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Flush all staged changes to disk
    pub fn commit(&self) -> Result<()> {
        for (path, change) in &self.staged {
            let target = self.disk_path(path);
            match change {
                Change::Overwrite(content) => {
                    ensure_parent_dir(&target)?;
                    std::fs::write(&target, content)
                        .map_err(|e| file_write_failed(path, e.to_string()))?;
                }
                Change::Delete => {
                    std::fs::remove_file(&target).map_err(|e| JestifyError::FileDeleteFailed {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// Ensure parent directory exists for a path
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| file_write_failed(parent.display().to_string(), e.to_string()))?;
    }
    Ok(())
}
