//! Pure in-memory edits on JSON configuration documents
//!
//! Every document edit in the migration goes through [`apply_patches`] and the
//! four primitives here, so there is exactly one tested code path for all of
//! them. The primitives never fail on absent fields; the only error condition
//! is a field on the edit path that exists but is not an object.

use serde_json::{Map, Value};

use crate::error::{Result, malformed_document};

/// A single named edit against a JSON document
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    /// Delete `document[category][key]`; no-op when either is absent
    Remove { category: String, key: String },
    /// Set `document[category][key] = version`, creating the category lazily.
    ///
    /// Unconditional overwrite: a placeholder inserted by an earlier step is
    /// superseded by the resolved version from a later one.
    Add {
        category: String,
        key: String,
        version: String,
    },
    /// Set the field at `path`, creating intermediate objects as needed
    Set { path: Vec<String>, value: Value },
    /// Delete the field at `path` when the path fully resolves
    RemoveIfPresent { path: Vec<String> },
}

impl PatchOp {
    pub fn remove(category: &str, key: &str) -> Self {
        PatchOp::Remove {
            category: category.to_string(),
            key: key.to_string(),
        }
    }

    pub fn add(category: &str, key: &str, version: &str) -> Self {
        PatchOp::Add {
            category: category.to_string(),
            key: key.to_string(),
            version: version.to_string(),
        }
    }

    pub fn set(path: &[&str], value: Value) -> Self {
        PatchOp::Set {
            path: path.iter().map(|s| (*s).to_string()).collect(),
            value,
        }
    }

    pub fn remove_if_present(path: &[&str]) -> Self {
        PatchOp::RemoveIfPresent {
            path: path.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Apply a list of edits to a document, in order
pub fn apply_patches(doc: &mut Value, ops: &[PatchOp]) -> Result<()> {
    for op in ops {
        match op {
            PatchOp::Remove { category, key } => {
                remove_entry(doc, category, key)?;
            }
            PatchOp::Add {
                category,
                key,
                version,
            } => add_entry(doc, category, key, version)?,
            PatchOp::Set { path, value } => {
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                set_field(doc, &segments, value.clone())?;
            }
            PatchOp::RemoveIfPresent { path } => {
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                remove_field_if_present(doc, &segments)?;
            }
        }
    }
    Ok(())
}

fn as_object_mut<'a>(value: &'a mut Value, field: &str) -> Result<&'a mut Map<String, Value>> {
    value
        .as_object_mut()
        .ok_or_else(|| malformed_document(format!("'{field}' is not an object")))
}

/// Delete `doc[category][key]`; returns whether the key was present
pub fn remove_entry(doc: &mut Value, category: &str, key: &str) -> Result<bool> {
    let root = as_object_mut(doc, "document root")?;
    match root.get_mut(category) {
        None => Ok(false),
        Some(entries) => Ok(as_object_mut(entries, category)?.remove(key).is_some()),
    }
}

/// Set `doc[category][key] = version`, creating the category map lazily
pub fn add_entry(doc: &mut Value, category: &str, key: &str, version: &str) -> Result<()> {
    let root = as_object_mut(doc, "document root")?;
    let entries = root
        .entry(category.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    as_object_mut(entries, category)?.insert(key.to_string(), Value::String(version.to_string()));
    Ok(())
}

/// Set the field at `path`, creating intermediate objects as needed
pub fn set_field(doc: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let (terminal, intermediates) = match path.split_last() {
        Some(split) => split,
        None => return Ok(()),
    };

    let mut cursor = doc;
    let mut walked = String::from("document root");
    for segment in intermediates {
        cursor = as_object_mut(cursor, &walked)?
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        walked = (*segment).to_string();
    }

    as_object_mut(cursor, &walked)?.insert((*terminal).to_string(), value);
    Ok(())
}

/// Delete the field at `path` if the path fully resolves; returns whether it did
pub fn remove_field_if_present(doc: &mut Value, path: &[&str]) -> Result<bool> {
    let (terminal, intermediates) = match path.split_last() {
        Some(split) => split,
        None => return Ok(false),
    };

    let mut cursor = doc;
    let mut walked = String::from("document root");
    for segment in intermediates {
        cursor = match cursor.get_mut(*segment) {
            None => return Ok(false),
            Some(next) if next.is_object() => next,
            Some(_) => return Err(malformed_document(format!("'{segment}' is not an object"))),
        };
        walked = (*segment).to_string();
    }

    Ok(as_object_mut(cursor, &walked)?.remove(*terminal).is_some())
}
