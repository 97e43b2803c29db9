//! Command line argument parsing and validation.

use crate::bundler::platform::Platform;
use crate::config::CliOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Multi-platform xcframework bundler for VLCKit releases
#[derive(Parser, Debug)]
#[command(
    name = "vlckit_bundler",
    version,
    about = "Builds, merges and packages VLCKit as a multi-platform xcframework",
    long_about = "Clones the upstream VLCKit source, drives its build script once per Apple \
platform, merges the per-platform frameworks into one xcframework with \
`xcodebuild -create-xcframework`, and packages the result with a SHA-256 \
checksum record.

Usage:
  vlckit_bundler fetch
  vlckit_bundler build-all
  vlckit_bundler merge
  vlckit_bundler package 3.6.0

or everything in one run:
  vlckit_bundler release 3.6.0"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Configuration flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Upstream repository URL
    #[arg(long, value_name = "URL", env = "VLCKIT_UPSTREAM_URL", global = true)]
    pub upstream_url: Option<String>,

    /// Branch or tag to clone
    #[arg(long, value_name = "REF", env = "VLCKIT_UPSTREAM_BRANCH", global = true)]
    pub branch: Option<String>,

    /// Local checkout path for the upstream source
    #[arg(long, value_name = "PATH", env = "VLCKIT_CHECKOUT_DIR", global = true)]
    pub checkout_dir: Option<PathBuf>,

    /// Directory receiving build outputs and packages
    #[arg(long, value_name = "PATH", env = "VLCKIT_BUILD_DIR", global = true)]
    pub build_dir: Option<PathBuf>,

    /// Product name of the framework being bundled
    #[arg(long, value_name = "NAME", global = true)]
    pub product: Option<String>,
}

impl From<&GlobalArgs> for CliOverrides {
    fn from(args: &GlobalArgs) -> Self {
        CliOverrides {
            product: args.product.clone(),
            upstream_url: args.upstream_url.clone(),
            upstream_branch: args.branch.clone(),
            checkout_dir: args.checkout_dir.clone(),
            build_dir: args.build_dir.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clone or refresh the upstream source (remove-then-clone)
    Fetch,

    /// Invoke the upstream build script for one platform
    Build {
        /// Platform to build
        #[arg(value_enum)]
        platform: Platform,
    },

    /// Build every platform sequentially
    BuildAll {
        /// Abort on the first platform failure instead of continuing
        #[arg(long)]
        fail_fast: bool,
    },

    /// Discover variant bundles and merge them into one xcframework
    Merge,

    /// Archive the merged xcframework and write its checksum record
    Package {
        /// Release version embedded in the package name
        version: String,
    },

    /// Run the whole pipeline: fetch, build-all, merge, package
    Release {
        /// Release version embedded in the package name
        version: String,

        /// Abort on the first platform failure instead of continuing
        #[arg(long)]
        fail_fast: bool,
    },

    /// Remove the checkout and all build outputs
    Clean,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        let version = match &self.command {
            Command::Package { version } | Command::Release { version, .. } => version,
            _ => return Ok(()),
        };
        if version.is_empty() {
            return Err("Version cannot be empty".to_string());
        }
        // The version is embedded in filenames.
        if version.contains('/') || version.contains(char::is_whitespace) {
            return Err(format!(
                "Invalid version `{}`: must not contain path separators or whitespace",
                version
            ));
        }
        Ok(())
    }
}
