//! Version command implementation

use crate::error::Result;
use crate::registry::DEFAULT_REGISTRY_URL;
use crate::rules::JEST_BUILDER;

/// Run version command
pub fn run() -> Result<()> {
    println!("jestify {} ({})", env!("CARGO_PKG_VERSION"), build_profile());
    println!();
    println!("Migrates the workspace test target to:");
    println!("  Builder: {JEST_BUILDER}");
    println!("  Versions pinned from: {DEFAULT_REGISTRY_URL}");

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
