//! Upstream source checkout.
//!
//! Remove-then-clone semantics: an existing checkout is deleted before a
//! fresh shallow clone, so stale or partial trees are never reused. There
//! is no incremental pull and no retry; clone failures surface git's own
//! stderr.

use crate::bundler::error::Result;
use crate::bundler::runner::{ProcessRequest, ProcessRunner, run_checked};
use crate::bundler::utils::fs;
use crate::config::BundleConfig;

/// Guarantees a fresh checkout of the upstream repository at the configured
/// path.
pub async fn fetch(config: &BundleConfig, runner: &dyn ProcessRunner) -> Result<()> {
    let checkout = config.checkout_dir();
    fs::remove_dir_all(checkout).await?;
    if let Some(parent) = checkout.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent, false).await?;
    }

    let mut request = ProcessRequest::new("git").args(["clone", "--depth=1"]);
    if let Some(branch) = config.upstream_branch() {
        request = request.arg("--branch").arg(branch);
    }
    request = request
        .arg(config.upstream_url())
        .arg(checkout.display().to_string());

    log::info!("Cloning {} into {}", config.upstream_url(), checkout.display());
    run_checked(runner, &request).await?;
    log::info!("✓ Fresh checkout at {}", checkout.display());
    Ok(())
}
