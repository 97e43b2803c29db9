//! Immutable pipeline configuration.
//!
//! One [`BundleConfig`] value is resolved up front and passed by reference
//! to every pipeline stage; nothing reads process-wide mutable state.
//! Resolution order: CLI flag (with environment fallback, handled by clap)
//! over configuration file over built-in default.

use crate::bundler::platform::Platform;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration file looked for in the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILE: &str = "vlckit-bundler.toml";

/// Upstream repository cloned by the fetch stage.
pub const DEFAULT_UPSTREAM_URL: &str = "https://code.videolan.org/videolan/VLCKit.git";

/// Build script expected inside the checkout.
pub const DEFAULT_BUILD_SCRIPT: &str = "compileAndBuildVLCKit.sh";

/// Immutable configuration threaded through every pipeline stage.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    product: String,
    upstream_url: String,
    upstream_branch: Option<String>,
    checkout_dir: PathBuf,
    build_dir: PathBuf,
    build_script: String,
    platform_args: HashMap<Platform, Vec<String>>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            product: "VLCKit".to_string(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_branch: None,
            checkout_dir: PathBuf::from("vlckit"),
            build_dir: PathBuf::from("build"),
            build_script: DEFAULT_BUILD_SCRIPT.to_string(),
            platform_args: HashMap::new(),
        }
    }
}

impl BundleConfig {
    /// Folds the optional configuration file and the CLI overrides into a
    /// resolved configuration.
    pub fn resolve(cli: &CliOverrides, file: Option<ConfigFile>) -> Self {
        let file = file.unwrap_or_default();
        let mut config = BundleConfig::default();

        if let Some(v) = file.product {
            config.product = v;
        }
        if let Some(v) = file.upstream_url {
            config.upstream_url = v;
        }
        if let Some(v) = file.upstream_branch {
            config.upstream_branch = Some(v);
        }
        if let Some(v) = file.checkout_dir {
            config.checkout_dir = v;
        }
        if let Some(v) = file.build_dir {
            config.build_dir = v;
        }
        if let Some(v) = file.build_script {
            config.build_script = v;
        }
        for (key, overrides) in file.platforms {
            match (Platform::from_config_key(&key), overrides.args) {
                (Some(platform), Some(args)) => {
                    config.platform_args.insert(platform, args);
                }
                (None, _) => log::warn!("Ignoring unknown platform `{}` in config file", key),
                (_, None) => {}
            }
        }

        if let Some(v) = &cli.product {
            config.product = v.clone();
        }
        if let Some(v) = &cli.upstream_url {
            config.upstream_url = v.clone();
        }
        if let Some(v) = &cli.upstream_branch {
            config.upstream_branch = Some(v.clone());
        }
        if let Some(v) = &cli.checkout_dir {
            config.checkout_dir = v.clone();
        }
        if let Some(v) = &cli.build_dir {
            config.build_dir = v.clone();
        }

        config
    }

    /// Returns the product name (framework base name, e.g. `VLCKit`).
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Returns the upstream repository URL.
    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    /// Returns the branch or tag to clone, if any.
    pub fn upstream_branch(&self) -> Option<&str> {
        self.upstream_branch.as_deref()
    }

    /// Returns the local checkout path.
    pub fn checkout_dir(&self) -> &Path {
        &self.checkout_dir
    }

    /// Returns the directory receiving build outputs and packages.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Returns the full path of the upstream build script.
    pub fn build_script_path(&self) -> PathBuf {
        self.checkout_dir.join(&self.build_script)
    }

    /// Returns the path of the merged artifact.
    pub fn artifact_path(&self) -> PathBuf {
        self.build_dir.join(format!("{}.xcframework", self.product))
    }

    /// Upstream-script arguments for one platform: the configured override
    /// when present, the platform default otherwise.
    pub fn script_args_for(&self, platform: Platform) -> Vec<String> {
        if let Some(args) = self.platform_args.get(&platform) {
            return args.clone();
        }
        platform
            .default_script_args()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Values taken from the command line (clap merges environment fallbacks
/// before this struct is built).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub product: Option<String>,
    pub upstream_url: Option<String>,
    pub upstream_branch: Option<String>,
    pub checkout_dir: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
}

/// On-disk configuration file format (`vlckit-bundler.toml`).
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConfigFile {
    pub product: Option<String>,
    pub upstream_url: Option<String>,
    pub upstream_branch: Option<String>,
    pub checkout_dir: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub build_script: Option<String>,
    pub platforms: HashMap<String, PlatformOverride>,
}

/// Per-platform overrides in the configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlatformOverride {
    /// Replaces the platform's default upstream-script arguments entirely.
    pub args: Option<Vec<String>>,
}

impl ConfigFile {
    /// Loads and parses a configuration file.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
