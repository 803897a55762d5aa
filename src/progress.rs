//! Spinner display for the slow parts of the migration

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while waiting on the registry or the package manager
pub fn spinner(message: &str) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
