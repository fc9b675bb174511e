use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::{Error, Result};
use crate::media::MediaExtensions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryClass {
    Media,
    Other,
}

/// One record of the archive's central directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub is_directory: bool,
    pub class: EntryClass,
}

impl ArchiveEntry {
    fn classify(name: &str, media: &MediaExtensions) -> Self {
        let is_directory = name.ends_with('/') || name.ends_with('\\');
        let class = if !is_directory && media.matches(name) {
            EntryClass::Media
        } else {
            EntryClass::Other
        };
        Self {
            name: name.to_string(),
            is_directory,
            class,
        }
    }

    pub fn is_media(&self) -> bool {
        self.class == EntryClass::Media
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    pub total_entries: usize,
    pub media_entries: usize,
}

impl AnalysisResult {
    /// The count worth reporting: media entries when there are any,
    /// otherwise every entry.
    pub fn headline_count(&self) -> (usize, bool) {
        if self.media_entries > 0 {
            (self.media_entries, true)
        } else {
            (self.total_entries, false)
        }
    }
}

/// Enumerate and classify every entry without extracting anything.
pub fn entries(archive_path: &Path, media: &MediaExtensions) -> Result<Vec<ArchiveEntry>> {
    let file = File::open(archive_path).map_err(|e| Error::Open {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    entries_from_reader(file, media)
}

pub(crate) fn entries_from_reader<R: Read + Seek>(
    reader: R,
    media: &MediaExtensions,
) -> Result<Vec<ArchiveEntry>> {
    let archive = zip::ZipArchive::new(reader).map_err(Error::InvalidArchive)?;

    (0..archive.len())
        .map(|i| {
            archive
                .name_for_index(i)
                .map(|name| ArchiveEntry::classify(name, media))
                .ok_or(Error::InvalidArchive(zip::result::ZipError::FileNotFound))
        })
        .collect()
}

/// Count total and media entries of the archive at `archive_path`.
///
/// Fails with [`Error::InvalidArchive`] (or [`Error::Open`]) when the
/// container or its central directory cannot be read.
pub fn analyze(archive_path: &Path, media: &MediaExtensions) -> Result<AnalysisResult> {
    let entries = entries(archive_path, media)?;
    let result = AnalysisResult {
        total_entries: entries.len(),
        media_entries: entries.iter().filter(|e| e.is_media()).count(),
    };
    tracing::debug!(
        archive = %archive_path.display(),
        total = result.total_entries,
        media = result.media_entries,
        "analyzed archive"
    );
    Ok(result)
}
