//! VLCKit Bundler - multi-platform xcframework build pipeline.
//!
//! This binary clones the upstream VLCKit source, builds it per Apple
//! platform, merges the per-platform frameworks into one xcframework and
//! packages the result for distribution.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match vlckit_bundler::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
