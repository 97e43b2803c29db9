//! Fan-in of discovered variant bundles into one xcframework.
//!
//! Discovery decides what exists; this module decides whether that is
//! enough, then hands the full list to `xcodebuild -create-xcframework` in
//! a single invocation. The empty case fails before the merge tool is ever
//! launched, with a diagnostic naming every expected directory that was
//! missing or empty.

use crate::bail;
use crate::bundler::discovery::{self, Discovery, DiscoveryResult};
use crate::bundler::error::{Context, Error, Result};
use crate::bundler::runner::{ProcessRequest, ProcessRunner, run_checked};
use crate::bundler::utils::fs;
use crate::config::BundleConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A merged artifact, described for the human-facing report.
#[derive(Debug)]
pub struct MergedArtifact {
    /// Path of the merged xcframework
    pub path: PathBuf,
    /// Total on-disk size in bytes
    pub size: u64,
    /// Number of variant bundles merged in
    pub variant_count: usize,
    /// Platform slices listed by the artifact's own manifest,
    /// e.g. `ios`, `ios-simulator`, `macos`
    pub platforms: Vec<String>,
}

/// Discovers variant bundles and merges them into one xcframework.
pub async fn merge(config: &BundleConfig, runner: &dyn ProcessRunner) -> Result<MergedArtifact> {
    let discovery = discovery::discover(config.build_dir(), config.product())?;
    merge_discovered(config, runner, discovery).await
}

/// Merges an already-computed discovery.
///
/// Split from [`merge`] so callers can inspect the discovery (for tool
/// preflight or reporting) without scanning twice.
pub async fn merge_discovered(
    config: &BundleConfig,
    runner: &dyn ProcessRunner,
    discovery: Discovery,
) -> Result<MergedArtifact> {
    let bundles = discovery.bundles();
    if bundles.is_empty() {
        let mut checked = Vec::new();
        for scan in &discovery.scans {
            match &scan.result {
                DiscoveryResult::Absent => {
                    checked.push(format!("{} (missing)", scan.expected_dir.display()));
                }
                DiscoveryResult::Found(slices) if slices.is_empty() => {
                    checked.push(format!(
                        "{} (no valid variant bundles)",
                        scan.expected_dir.display()
                    ));
                }
                DiscoveryResult::Found(_) => {}
            }
        }
        bail!(
            "no variant bundles found in any platform output; checked: {}",
            checked.join(", ")
        );
    }

    let output_path = config.artifact_path();
    // The previous artifact is always replaced whole, never patched.
    fs::remove_dir_all(&output_path)
        .await
        .with_context(|| format!("removing previous artifact {}", output_path.display()))?;

    let mut request = ProcessRequest::new("xcodebuild").arg("-create-xcframework");
    for bundle in &bundles {
        request = request
            .arg("-framework")
            .arg(bundle.framework_path.display().to_string());
    }
    request = request.arg("-output").arg(output_path.display().to_string());

    log::info!(
        "Merging {} variant bundles into {}",
        bundles.len(),
        output_path.display()
    );
    run_checked(runner, &request).await?;

    let size = artifact_size(&output_path).await?;
    let platforms = match read_manifest_platforms(&output_path) {
        Ok(platforms) => platforms,
        Err(e) => {
            log::debug!("Could not read merged artifact manifest: {}", e);
            Vec::new()
        }
    };

    Ok(MergedArtifact {
        path: output_path,
        size,
        variant_count: bundles.len(),
        platforms,
    })
}

/// Sums the file sizes of the artifact tree.
async fn artifact_size(path: &Path) -> Result<u64> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut total = 0u64;
        for entry in walkdir::WalkDir::new(&path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file()
                && let Ok(metadata) = entry.metadata()
            {
                total += metadata.len();
            }
        }
        total
    })
    .await
    .map_err(|e| Error::GenericError(format!("size accounting task panicked: {}", e)))
}

#[derive(Debug, Deserialize)]
struct XcframeworkManifest {
    #[serde(rename = "AvailableLibraries", default)]
    available_libraries: Vec<LibraryEntry>,
}

#[derive(Debug, Deserialize)]
struct LibraryEntry {
    #[serde(rename = "SupportedPlatform")]
    supported_platform: String,
    #[serde(rename = "SupportedPlatformVariant")]
    supported_platform_variant: Option<String>,
}

/// Reads the platform slices out of the merged artifact's `Info.plist`.
fn read_manifest_platforms(artifact: &Path) -> Result<Vec<String>> {
    let manifest: XcframeworkManifest = plist::from_file(artifact.join("Info.plist"))?;
    let mut platforms: Vec<String> = manifest
        .available_libraries
        .into_iter()
        .map(|library| match library.supported_platform_variant {
            Some(variant) => format!("{}-{}", library.supported_platform, variant),
            None => library.supported_platform,
        })
        .collect();
    platforms.sort();
    platforms.dedup();
    Ok(platforms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::runner::fake::FakeRunner;
    use crate::config::{BundleConfig, CliOverrides, ConfigFile};
    use std::path::Path;

    fn config_for(build_dir: &Path) -> BundleConfig {
        let file: ConfigFile =
            toml::from_str(&format!("build-dir = {:?}", build_dir)).unwrap();
        BundleConfig::resolve(&CliOverrides::default(), Some(file))
    }

    fn make_variant(build_dir: &Path, platform_dir: &str, slice: &str) {
        let framework = build_dir
            .join(platform_dir)
            .join("VLCKit.xcframework")
            .join(slice)
            .join("VLCKit.framework");
        std::fs::create_dir_all(&framework).unwrap();
        std::fs::write(framework.join("VLCKit"), b"binary").unwrap();
    }

    #[tokio::test]
    async fn empty_discovery_fails_without_invoking_the_merge_tool() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_for(temp.path());
        let runner = FakeRunner::succeeding();

        let err = merge(&config, &runner).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no variant bundles found"));
        assert!(message.contains("iOS"));
        assert!(message.contains("xrOS"));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn partial_fan_in_merges_whatever_was_produced() {
        let temp = tempfile::tempdir().unwrap();
        make_variant(temp.path(), "iOS", "ios-arm64");
        make_variant(temp.path(), "iOS", "ios-x86_64-simulator");
        make_variant(temp.path(), "macOS", "macos-arm64");
        let config = config_for(temp.path());
        let runner = FakeRunner::succeeding();

        let artifact = merge(&config, &runner).await.unwrap();
        assert_eq!(artifact.variant_count, 3);
        assert_eq!(artifact.path, temp.path().join("VLCKit.xcframework"));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.program, "xcodebuild");
        assert_eq!(request.args[0], "-create-xcframework");
        let framework_args = request
            .args
            .iter()
            .filter(|a| *a == "-framework")
            .count();
        assert_eq!(framework_args, 3);
        assert_eq!(request.args[request.args.len() - 2], "-output");
    }

    #[tokio::test]
    async fn merge_tool_failure_surfaces_its_stderr() {
        let temp = tempfile::tempdir().unwrap();
        make_variant(temp.path(), "iOS", "ios-arm64");
        let config = config_for(temp.path());
        let runner = FakeRunner::failing("error: binaries with multiple platforms");

        let err = merge(&config, &runner).await.unwrap_err();
        assert!(err.to_string().contains("binaries with multiple platforms"));
    }

    #[tokio::test]
    async fn stale_artifact_is_removed_before_the_merge() {
        let temp = tempfile::tempdir().unwrap();
        make_variant(temp.path(), "iOS", "ios-arm64");
        let config = config_for(temp.path());
        let stale = config.artifact_path().join("stale-slice");
        std::fs::create_dir_all(&stale).unwrap();
        let runner = FakeRunner::succeeding();

        merge(&config, &runner).await.unwrap();
        // The fake runner creates nothing, so the old tree being gone proves
        // the removal happened.
        assert!(!stale.exists());
    }

    #[test]
    fn manifest_platforms_include_variants() {
        let temp = tempfile::tempdir().unwrap();
        let artifact = temp.path().join("VLCKit.xcframework");
        std::fs::create_dir_all(&artifact).unwrap();
        std::fs::write(
            artifact.join("Info.plist"),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>AvailableLibraries</key>
    <array>
        <dict>
            <key>LibraryIdentifier</key>
            <string>ios-arm64</string>
            <key>SupportedPlatform</key>
            <string>ios</string>
        </dict>
        <dict>
            <key>LibraryIdentifier</key>
            <string>ios-x86_64-simulator</string>
            <key>SupportedPlatform</key>
            <string>ios</string>
            <key>SupportedPlatformVariant</key>
            <string>simulator</string>
        </dict>
    </array>
    <key>CFBundlePackageType</key>
    <string>XFWK</string>
</dict>
</plist>"#,
        )
        .unwrap();

        let platforms = read_manifest_platforms(&artifact).unwrap();
        assert_eq!(platforms, vec!["ios", "ios-simulator"]);
    }
}
