//! Command execution for the bundler pipeline.
//!
//! One handler per subcommand. Handlers return the process exit code;
//! partial failures that already printed their own report (build-all)
//! return a nonzero code instead of an error.

use crate::bundler::discovery;
use crate::bundler::merge as merge_stage;
use crate::bundler::package as package_stage;
use crate::bundler::platform::Platform;
use crate::bundler::runner::ProcessRunner;
use crate::bundler::tool_detection::{HAS_GIT, HAS_XCODEBUILD};
use crate::bundler::builder;
use crate::bundler::utils::fs;
use crate::cli::output::OutputManager;
use crate::config::BundleConfig;
use crate::error::{CliError, Result};
use crate::source;

/// `fetch`: remove-then-clone the upstream source.
pub async fn fetch(
    config: &BundleConfig,
    runner: &dyn ProcessRunner,
    output: &OutputManager,
) -> Result<i32> {
    if !*HAS_GIT {
        return Err(CliError::MissingTool {
            tool: "git".to_string(),
            hint: "Install git and re-run `fetch`.".to_string(),
        }
        .into());
    }

    output.stage(&format!("Fetching {}", config.upstream_url()));
    source::fetch(config, runner).await?;
    output.success(&format!(
        "Fresh checkout at {}",
        config.checkout_dir().display()
    ));
    Ok(0)
}

/// `build <platform>`: invoke the upstream script once.
pub async fn build(
    config: &BundleConfig,
    runner: &dyn ProcessRunner,
    output: &OutputManager,
    platform: Platform,
) -> Result<i32> {
    output.stage(&format!("Building {}", platform));
    builder::build_platform(config, runner, platform).await?;
    output.success(&format!("{} build finished", platform));
    Ok(0)
}

/// `build-all`: invoke the upstream script for every platform.
pub async fn build_all(
    config: &BundleConfig,
    runner: &dyn ProcessRunner,
    output: &OutputManager,
    fail_fast: bool,
) -> Result<i32> {
    output.stage("Building all platforms");
    let outcomes = builder::build_all(config, runner, fail_fast).await;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => output.indent(&format!("{}: ok", outcome.platform)),
            Err(e) => {
                failed += 1;
                output.warn(&format!("{}: {}", outcome.platform, e));
            }
        }
    }

    if failed > 0 {
        output.warn(&format!(
            "{} of {} platform builds failed",
            failed,
            outcomes.len()
        ));
        return Ok(1);
    }
    output.success("All platform builds finished");
    Ok(0)
}

/// `merge`: discover variant bundles and fan them into one xcframework.
pub async fn merge(
    config: &BundleConfig,
    runner: &dyn ProcessRunner,
    output: &OutputManager,
) -> Result<i32> {
    output.stage("Discovering and merging variant bundles");
    let discovery = discovery::discover(config.build_dir(), config.product())?;

    // The empty case must fail on its own diagnostic, so the tool preflight
    // only applies once there is something to merge.
    if !discovery.is_empty() && !*HAS_XCODEBUILD {
        return Err(CliError::MissingTool {
            tool: "xcodebuild".to_string(),
            hint: "Install the Xcode command line tools.".to_string(),
        }
        .into());
    }

    let artifact = merge_stage::merge_discovered(config, runner, discovery).await?;
    output.success(&format!(
        "Merged {} variant bundles into {} ({} bytes)",
        artifact.variant_count,
        artifact.path.display(),
        artifact.size
    ));
    if !artifact.platforms.is_empty() {
        output.indent(&format!("platforms: {}", artifact.platforms.join(", ")));
    }
    Ok(0)
}

/// `package <version>`: archive the merged artifact and write its checksum.
pub async fn package(
    config: &BundleConfig,
    output: &OutputManager,
    version: &str,
) -> Result<i32> {
    output.stage(&format!("Packaging {} {}", config.product(), version));
    let release = package_stage::package(config, version).await?;
    output.success(&format!("Created {}", release.archive_path.display()));
    output.indent(&format!("sha256: {}", release.digest));
    Ok(0)
}

/// `release <version>`: the whole pipeline in one run.
///
/// Platform build failures follow the continue-on-error policy: the merge
/// still runs over whatever was produced, and the final exit code is
/// nonzero when any platform failed.
pub async fn release(
    config: &BundleConfig,
    runner: &dyn ProcessRunner,
    output: &OutputManager,
    version: &str,
    fail_fast: bool,
) -> Result<i32> {
    fetch(config, runner, output).await?;
    let build_code = build_all(config, runner, output, fail_fast).await?;
    if build_code != 0 && fail_fast {
        return Ok(build_code);
    }
    merge(config, runner, output).await?;
    package(config, output, version).await?;
    Ok(build_code)
}

/// `clean`: remove the checkout and all build outputs.
pub async fn clean(config: &BundleConfig, output: &OutputManager) -> Result<i32> {
    output.stage("Cleaning generated paths");
    fs::remove_dir_all(config.checkout_dir()).await?;
    fs::remove_dir_all(config.build_dir()).await?;
    output.success("Clean");
    Ok(0)
}
