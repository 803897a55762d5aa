//! Command implementations for the jestify CLI

pub mod completions;
pub mod migrate;
pub mod version;
