//! YAML loading for the survey schema.
//!
//! Deliberately thin: syntactic YAML parsing is an external collaborator per
//! spec.md §1, not part of the conversation engine's core. This module only
//! reads the file and hands the parsed tree to [`super::validate`].

use std::path::Path;

use crate::error::Result;
use crate::schema::tree::Schema;

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Schema> {
    let raw = std::fs::read_to_string(path)?;
    load_from_str(&raw)
}

pub fn load_from_str(raw: &str) -> Result<Schema> {
    let schema: Schema = serde_yaml::from_str(raw)?;
    Ok(schema)
}
