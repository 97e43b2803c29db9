//! Archive creation and checksum record for the merged artifact.
//!
//! Packaging is a pure function of (artifact bytes, version string): entries
//! are written in sorted path order with fixed timestamps and permissions,
//! so re-running produces byte-identical archives and digests.

use crate::bail;
use crate::bundler::checksum::calculate_sha256;
use crate::bundler::error::{Error, ErrorExt, Result};
use crate::config::BundleConfig;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Files created by a packaging run.
#[derive(Debug)]
pub struct PackagedRelease {
    /// Path of the zip archive
    pub archive_path: PathBuf,
    /// Path of the checksum record
    pub checksum_path: PathBuf,
    /// Hex-encoded SHA-256 digest of the archive
    pub digest: String,
}

/// Archive filename for a product and version, e.g.
/// `VLCKit-3.6.0.xcframework.zip`.
pub fn archive_name(product: &str, version: &str) -> String {
    format!("{product}-{version}.xcframework.zip")
}

/// Checksum record filename for a product and version, e.g.
/// `VLCKit-3.6.0.sha256`.
pub fn checksum_name(product: &str, version: &str) -> String {
    format!("{product}-{version}.sha256")
}

/// Archives the merged artifact and writes its checksum record.
pub async fn package(config: &BundleConfig, version: &str) -> Result<PackagedRelease> {
    let artifact = config.artifact_path();
    if !artifact.is_dir() {
        bail!(
            "unified artifact not found at {}; run `merge` first",
            artifact.display()
        );
    }

    let archive_path = config
        .build_dir()
        .join(archive_name(config.product(), version));
    let checksum_path = config
        .build_dir()
        .join(checksum_name(config.product(), version));

    log::info!(
        "Packaging {} -> {}",
        artifact.display(),
        archive_path.display()
    );
    write_archive(artifact, archive_path.clone()).await?;

    let digest = calculate_sha256(&archive_path).await?;
    let archive_file_name = archive_name(config.product(), version);
    let record = format!("{}  {}\n", digest, archive_file_name);
    tokio::fs::write(&checksum_path, record)
        .await
        .fs_context("writing checksum record", &checksum_path)?;

    log::info!("✓ Packaged {} (sha256 {})", archive_file_name, digest);
    Ok(PackagedRelease {
        archive_path,
        checksum_path,
        digest,
    })
}

async fn write_archive(artifact: PathBuf, archive: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || write_archive_blocking(&artifact, &archive))
        .await
        .map_err(|e| Error::GenericError(format!("archive task panicked: {}", e)))?
}

fn write_archive_blocking(artifact: &Path, archive: &Path) -> Result<()> {
    let root_name = artifact
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::GenericError(format!("invalid artifact path: {}", artifact.display()))
        })?;

    if archive.exists() {
        std::fs::remove_file(archive).fs_context("removing previous archive", archive)?;
    }

    // Sorted entry order keeps the archive byte-identical across runs.
    let mut entries: Vec<walkdir::DirEntry> = walkdir::WalkDir::new(artifact)
        .follow_links(false)
        .into_iter()
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| Error::GenericError(format!("walking artifact tree: {}", e)))?;
    entries.sort_by(|a, b| a.path().cmp(b.path()));

    let file = File::create(archive).fs_context("creating archive", archive)?;
    let mut writer = ZipWriter::new(file);
    // Fixed timestamps and permissions; the content, not the build moment,
    // defines the archive.
    let dir_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o755);
    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);
    let symlink_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(zip::DateTime::default());

    for entry in entries {
        let rel = entry
            .path()
            .strip_prefix(artifact)
            .map_err(|e| Error::GenericError(format!("entry outside artifact tree: {}", e)))?;
        let name = if rel.as_os_str().is_empty() {
            root_name.to_string()
        } else {
            format!("{}/{}", root_name, rel.to_string_lossy())
        };

        if entry.path_is_symlink() {
            let target =
                std::fs::read_link(entry.path()).fs_context("reading symlink", entry.path())?;
            writer.add_symlink(
                name.as_str(),
                target.to_string_lossy().as_ref(),
                symlink_options.clone(),
            )?;
        } else if entry.file_type().is_dir() {
            writer.add_directory(name.as_str(), dir_options.clone())?;
        } else {
            writer.start_file(name.as_str(), file_options.clone())?;
            let mut source =
                File::open(entry.path()).fs_context("opening file for archiving", entry.path())?;
            io::copy(&mut source, &mut writer)?;
        }
    }

    writer.finish()?;
    Ok(())
}
