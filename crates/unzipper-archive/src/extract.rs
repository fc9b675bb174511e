//! All-or-nothing extraction of a ZIP archive.
//!
//! Every entry is written below the destination, preserving its relative
//! path. The first entry that cannot be written aborts the whole extraction;
//! whatever was already written is left for the caller to clean up.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sanitize::sanitize_path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedEntry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
    pub is_directory: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ExtractReport {
    pub entries: Vec<ExtractedEntry>,
    pub total_bytes: u64,
}

impl ExtractReport {
    pub fn files(&self) -> impl Iterator<Item = &ExtractedEntry> {
        self.entries.iter().filter(|e| !e.is_directory)
    }
}

/// Extract every entry of the archive at `archive_path` into `destination`.
pub fn extract(archive_path: &Path, destination: &Path) -> Result<ExtractReport> {
    let file = File::open(archive_path).map_err(|e| Error::Open {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let report = extract_from_reader(file, destination)?;
    tracing::debug!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        entries = report.entries.len(),
        bytes = report.total_bytes,
        "extracted archive"
    );
    Ok(report)
}

pub(crate) fn extract_from_reader<R: Read + Seek>(
    reader: R,
    destination: &Path,
) -> Result<ExtractReport> {
    let mut archive = zip::ZipArchive::new(reader).map_err(Error::InvalidArchive)?;
    let mut report = ExtractReport::default();

    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|source| Error::Corrupted { index, source })?;

        let raw_path = file.enclosed_name().ok_or_else(|| Error::InvalidPath {
            entry: file.name().to_string(),
        })?;
        let sanitized = sanitize_path(&raw_path, destination)?;

        let is_directory = file.is_dir();
        if is_directory {
            ensure_directory(&sanitized.resolved)?;
        } else {
            write_file(&mut file, &sanitized.resolved)?;
        }

        let size = file.size();
        report.total_bytes += size;
        report.entries.push(ExtractedEntry {
            original_path: sanitized.original,
            target_path: sanitized.resolved,
            size,
            is_directory,
        });
    }

    Ok(report)
}

fn write_file(reader: &mut impl Read, target_path: &Path) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        ensure_directory(parent)?;
    }

    let mut out = File::create(target_path).map_err(|e| Error::ExtractionFailed {
        path: target_path.to_path_buf(),
        source: e,
    })?;
    std::io::copy(reader, &mut out).map_err(|e| Error::ExtractionFailed {
        path: target_path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
