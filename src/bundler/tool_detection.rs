//! External tool detection and availability checking.
//!
//! The pipeline depends on `git` (fetch stage) and `xcodebuild` (merge
//! stage). Detection results are cached so preflight checks never spawn
//! repeated lookups.

use std::sync::LazyLock;

/// Check if git is available for the fetch stage.
pub static HAS_GIT: LazyLock<bool> = LazyLock::new(|| detect("git"));

/// Check if xcodebuild is available for the merge stage.
pub static HAS_XCODEBUILD: LazyLock<bool> = LazyLock::new(|| detect("xcodebuild"));

fn detect(tool: &str) -> bool {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            true
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            false
        }
    }
}
