//! Multi-platform xcframework bundler for VLCKit releases.
//!
//! Clones the upstream VLCKit repository, drives its build script once per
//! Apple platform, merges the per-platform frameworks into a single
//! xcframework with `xcodebuild -create-xcframework`, and packages the
//! result as a zip archive with a SHA-256 checksum record.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod source;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
