//! Per-platform invocation of the upstream build script.
//!
//! The build step is side-effect-only: the script's output tree is never
//! inspected here. Validation is deferred to discovery, which is the one
//! place that knows what a usable output looks like.

use crate::bail;
use crate::bundler::error::{ErrorExt, Result};
use crate::bundler::platform::Platform;
use crate::bundler::runner::{ProcessRequest, ProcessRunner, run_checked};
use crate::config::BundleConfig;

/// Outcome of one platform build attempt.
#[derive(Debug)]
pub struct BuildOutcome {
    pub platform: Platform,
    pub result: Result<()>,
}

impl BuildOutcome {
    /// Whether this platform's build exited successfully.
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Invokes the upstream build script for a single platform.
///
/// The script runs with the checkout as working directory and receives the
/// platform's flag arguments (all architectures, release mode). A nonzero
/// exit surfaces the script's stderr.
pub async fn build_platform(
    config: &BundleConfig,
    runner: &dyn ProcessRunner,
    platform: Platform,
) -> Result<()> {
    let script = config.build_script_path();
    if !script.is_file() {
        bail!(
            "upstream build script not found at {}; run `fetch` first",
            script.display()
        );
    }
    let script = script
        .canonicalize()
        .fs_context("resolving build script path", &script)?;

    let request = ProcessRequest::new(script.display().to_string())
        .args(config.script_args_for(platform))
        .cwd(config.checkout_dir());

    log::info!("Building {}: {}", platform, request.command_line());
    run_checked(runner, &request).await?;
    log::info!("✓ {} build finished", platform);
    Ok(())
}

/// Builds every platform in enumeration order.
///
/// By default a failed platform is reported and the remaining platforms are
/// still attempted; `fail_fast` stops at the first failure. Every attempted
/// platform appears in the returned outcomes.
pub async fn build_all(
    config: &BundleConfig,
    runner: &dyn ProcessRunner,
    fail_fast: bool,
) -> Vec<BuildOutcome> {
    let mut outcomes = Vec::new();
    for platform in Platform::ALL {
        let result = build_platform(config, runner, platform).await;
        let failed = result.is_err();
        if let Err(e) = &result {
            log::error!("{} build failed: {}", platform, e);
        }
        outcomes.push(BuildOutcome { platform, result });
        if failed && fail_fast {
            break;
        }
    }
    outcomes
}
