//! Error types for pipeline stage operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline stage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by all pipeline stages.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors without further attribution
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// IO errors attributed to a filesystem operation and path
    #[error("{context}: {}: {source}", path.display())]
    FsError {
        /// What was being attempted
        context: String,
        /// Path the operation failed on
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// External command could not be launched at all
    #[error("failed to launch `{command}`: {source}")]
    CommandLaunch {
        /// Full command line
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// External command ran and exited with failure; stderr is surfaced verbatim
    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        /// Full command line
        command: String,
        /// Captured standard error of the failed command
        stderr: String,
    },

    /// xcframework manifest parsing errors
    #[error("plist error: {0}")]
    Plist(#[from] plist::Error),

    /// Archive creation errors
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Freeform errors raised via [`crate::bail!`]
    #[error("{0}")]
    GenericError(String),
}

/// Extension trait attributing IO errors to an operation and path.
pub trait ErrorExt<T> {
    /// Wraps an IO error with the attempted operation and the path involved.
    fn fs_context(self, context: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::FsError {
            context: context.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Extension trait adding lazy message context to stage results.
pub trait Context<T> {
    /// Prepends a lazily-built message to the error.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {}", f(), e)))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_carries_path_and_operation() {
        let io: std::result::Result<(), _> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = io
            .fs_context("opening checkout", Path::new("/tmp/vlckit"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("opening checkout"));
        assert!(message.contains("/tmp/vlckit"));
    }

    #[test]
    fn bail_builds_generic_error() {
        fn failing() -> Result<()> {
            bail!("expected {} bundles", 3)
        }
        match failing() {
            Err(Error::GenericError(message)) => assert_eq!(message, "expected 3 bundles"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
