//! User-facing stage output.
//!
//! Stage markers go to stdout, warnings to stderr. Diagnostic detail goes
//! through `log` instead and is controlled with `RUST_LOG`.

/// Writes stage start/success markers and warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputManager;

impl OutputManager {
    /// Creates a new output manager.
    pub fn new() -> Self {
        Self
    }

    /// Prints a stage-start marker.
    pub fn stage(&self, message: &str) {
        println!("==> {}", message);
    }

    /// Prints a success marker.
    pub fn success(&self, message: &str) {
        println!("✓ {}", message);
    }

    /// Prints a warning.
    pub fn warn(&self, message: &str) {
        eprintln!("warning: {}", message);
    }

    /// Prints indented detail under the current stage.
    pub fn indent(&self, message: &str) {
        println!("    {}", message);
    }
}
