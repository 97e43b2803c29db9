//! The fixed set of Apple platforms the pipeline builds for.

use clap::ValueEnum;
use std::fmt;

/// One target platform for which the upstream script produces a build.
///
/// The enumeration is fixed; a platform that produced no output simply
/// contributes zero variant bundles at discovery time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Macos,
    Tvos,
    Xros,
}

impl Platform {
    /// Every platform, in pipeline order. The order is also lexicographic
    /// over [`Platform::output_dir_name`], which keeps merge input ordering
    /// reproducible without a separate sort.
    pub const ALL: [Platform; 4] = [
        Platform::Ios,
        Platform::Macos,
        Platform::Tvos,
        Platform::Xros,
    ];

    /// Human-facing platform name.
    pub fn name(self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Macos => "macOS",
            Platform::Tvos => "tvOS",
            Platform::Xros => "xrOS",
        }
    }

    /// Directory name the upstream script writes this platform's output
    /// under, relative to the build directory.
    pub fn output_dir_name(self) -> &'static str {
        self.name()
    }

    /// Key identifying this platform in the configuration file
    /// (`[platforms.<key>]`).
    pub fn config_key(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Macos => "macos",
            Platform::Tvos => "tvos",
            Platform::Xros => "xros",
        }
    }

    /// Default upstream-script arguments for this platform: the platform
    /// selector plus the all-architectures and release-mode switches.
    pub fn default_script_args(self) -> &'static [&'static str] {
        match self {
            Platform::Ios => &["-i", "-a", "all", "-r"],
            Platform::Macos => &["-m", "-a", "all", "-r"],
            Platform::Tvos => &["-t", "-a", "all", "-r"],
            Platform::Xros => &["-x", "-a", "all", "-r"],
        }
    }

    /// Looks a platform up by its configuration-file key.
    pub fn from_config_key(key: &str) -> Option<Platform> {
        Platform::ALL.into_iter().find(|p| p.config_key() == key)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumeration_order_is_lexicographic_over_dir_names() {
        let names: Vec<&str> = Platform::ALL.iter().map(|p| p.output_dir_name()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn config_keys_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_config_key(platform.config_key()), Some(platform));
        }
        assert_eq!(Platform::from_config_key("watchos"), None);
    }

    #[test]
    fn every_platform_has_a_distinct_selector_flag() {
        let mut selectors: Vec<&str> = Platform::ALL
            .iter()
            .map(|p| p.default_script_args()[0])
            .collect();
        selectors.sort();
        selectors.dedup();
        assert_eq!(selectors.len(), Platform::ALL.len());
    }
}
