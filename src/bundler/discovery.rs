//! Variant bundle discovery across per-platform build trees.
//!
//! The per-platform builds are opaque side effects; discovery is the single
//! validation point that turns whatever exists on disk into an explicit
//! value. A platform that produced nothing is recorded as [`DiscoveryResult::Absent`],
//! never silently skipped at use sites.

use crate::bundler::error::{ErrorExt, Result};
use crate::bundler::platform::Platform;
use std::path::{Path, PathBuf};

/// One architecture/environment slice of a platform build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantBundle {
    /// Slice identifier, e.g. `ios-arm64` or `ios-x86_64-simulator`.
    pub identifier: String,
    /// Path of the inner framework directory, the unit the merge tool
    /// consumes.
    pub framework_path: PathBuf,
}

/// Outcome of scanning one platform's expected output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryResult {
    /// The directory exists; it held zero or more qualifying slices.
    Found(Vec<VariantBundle>),
    /// The platform never produced an output directory.
    Absent,
}

/// One platform's scan, keeping the expected path for diagnostics.
#[derive(Debug)]
pub struct PlatformScan {
    pub platform: Platform,
    pub expected_dir: PathBuf,
    pub result: DiscoveryResult,
}

/// Discovery outcome for every platform in the fixed enumeration.
#[derive(Debug)]
pub struct Discovery {
    pub scans: Vec<PlatformScan>,
}

impl Discovery {
    /// Every qualifying variant bundle, in platform order then slice order.
    pub fn bundles(&self) -> Vec<&VariantBundle> {
        self.scans
            .iter()
            .filter_map(|scan| match &scan.result {
                DiscoveryResult::Found(bundles) => Some(bundles.iter()),
                DiscoveryResult::Absent => None,
            })
            .flatten()
            .collect()
    }

    /// Whether no platform contributed any variant bundle.
    pub fn is_empty(&self) -> bool {
        self.bundles().is_empty()
    }

    /// Expected directories that were never produced.
    pub fn missing_dirs(&self) -> Vec<&Path> {
        self.scans
            .iter()
            .filter(|scan| scan.result == DiscoveryResult::Absent)
            .map(|scan| scan.expected_dir.as_path())
            .collect()
    }
}

/// Scans every platform's expected intermediate tree under `build_dir`.
///
/// The expected layout per platform is
/// `<build_dir>/<platform dir>/<product>.xcframework/<slice>/<product>.framework`.
pub fn discover(build_dir: &Path, product: &str) -> Result<Discovery> {
    let mut scans = Vec::new();
    for platform in Platform::ALL {
        let expected_dir = build_dir
            .join(platform.output_dir_name())
            .join(format!("{product}.xcframework"));
        let result = scan_platform(&expected_dir, product)?;
        scans.push(PlatformScan {
            platform,
            expected_dir,
            result,
        });
    }
    Ok(Discovery { scans })
}

fn scan_platform(dir: &Path, product: &str) -> Result<DiscoveryResult> {
    if !dir.is_dir() {
        return Ok(DiscoveryResult::Absent);
    }

    let framework_name = format!("{product}.framework");
    let mut bundles = Vec::new();
    for entry in std::fs::read_dir(dir).fs_context("listing platform output directory", dir)? {
        let entry = entry.fs_context("reading platform output entry", dir)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_variant_name(name) {
            continue;
        }
        let framework_path = path.join(&framework_name);
        if !framework_path.is_dir() {
            log::debug!(
                "Skipping {}: no {} inside",
                path.display(),
                framework_name
            );
            continue;
        }
        bundles.push(VariantBundle {
            identifier: name.to_string(),
            framework_path,
        });
    }

    bundles.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    Ok(DiscoveryResult::Found(bundles))
}

/// Slice names follow `<platform>-<arch>[-<environment>]`.
fn is_variant_name(name: &str) -> bool {
    !name.starts_with('.') && name.contains('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_variant(build_dir: &Path, platform_dir: &str, slice: &str, with_framework: bool) {
        let slice_dir = build_dir
            .join(platform_dir)
            .join("VLCKit.xcframework")
            .join(slice);
        if with_framework {
            let framework = slice_dir.join("VLCKit.framework");
            std::fs::create_dir_all(&framework).unwrap();
            std::fs::write(framework.join("VLCKit"), b"binary").unwrap();
        } else {
            std::fs::create_dir_all(&slice_dir).unwrap();
        }
    }

    #[test]
    fn collects_valid_slices_across_present_platforms() {
        let temp = tempfile::tempdir().unwrap();
        let build_dir = temp.path();
        make_variant(build_dir, "iOS", "ios-arm64", true);
        make_variant(build_dir, "iOS", "ios-x86_64-simulator", true);
        make_variant(build_dir, "macOS", "macos-arm64", true);

        let discovery = discover(build_dir, "VLCKit").unwrap();
        let bundles = discovery.bundles();
        assert_eq!(bundles.len(), 3);
        assert_eq!(
            bundles.iter().map(|b| b.identifier.as_str()).collect::<Vec<_>>(),
            vec!["ios-arm64", "ios-x86_64-simulator", "macos-arm64"]
        );
        assert!(!discovery.is_empty());
        // tvOS and xrOS never produced output.
        assert_eq!(discovery.missing_dirs().len(), 2);
    }

    #[test]
    fn slices_without_inner_framework_are_excluded() {
        let temp = tempfile::tempdir().unwrap();
        let build_dir = temp.path();
        make_variant(build_dir, "iOS", "ios-arm64", true);
        make_variant(build_dir, "iOS", "ios-arm64_x86_64-maccatalyst", false);

        let discovery = discover(build_dir, "VLCKit").unwrap();
        assert_eq!(discovery.bundles().len(), 1);
    }

    #[test]
    fn non_variant_entries_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let build_dir = temp.path();
        make_variant(build_dir, "tvOS", "tvos-arm64", true);
        let platform_tree = build_dir.join("tvOS/VLCKit.xcframework");
        std::fs::write(platform_tree.join("Info.plist"), b"<plist/>").unwrap();
        std::fs::create_dir_all(platform_tree.join(".DS-leftover")).unwrap();
        std::fs::create_dir_all(platform_tree.join("Headers")).unwrap();

        let discovery = discover(build_dir, "VLCKit").unwrap();
        assert_eq!(discovery.bundles().len(), 1);
        assert_eq!(discovery.bundles()[0].identifier, "tvos-arm64");
    }

    #[test]
    fn empty_tree_reports_every_expected_dir_missing() {
        let temp = tempfile::tempdir().unwrap();
        let discovery = discover(temp.path(), "VLCKit").unwrap();
        assert!(discovery.is_empty());
        let missing = discovery.missing_dirs();
        assert_eq!(missing.len(), Platform::ALL.len());
        assert!(missing[0].ends_with("iOS/VLCKit.xcframework"));
    }

    #[test]
    fn present_but_empty_platform_dir_is_found_not_absent() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("iOS/VLCKit.xcframework")).unwrap();

        let discovery = discover(temp.path(), "VLCKit").unwrap();
        assert!(discovery.is_empty());
        assert_eq!(discovery.missing_dirs().len(), 3);
        assert_eq!(
            discovery.scans[0].result,
            DiscoveryResult::Found(Vec::new())
        );
    }
}
