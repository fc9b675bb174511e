//! ZIP analysis and extraction with path sanitization.
//!
//! # Architecture
//!
//! - `analyze.rs` - Read-only enumeration and media classification
//! - `extract.rs` - Extraction into a destination directory, stopping at the first bad entry
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `media.rs` - Media extension allow-list
//!
//! [`analyze`] is the single validation gate: an archive that passes it has a
//! readable central directory. [`extract`] may still fail on individual
//! entries (corrupt data, unsafe paths, disk full).

pub use analyze::{AnalysisResult, ArchiveEntry, EntryClass, analyze, entries};
pub use error::{Error, Result};
pub use extract::{ExtractReport, ExtractedEntry, extract};
pub use media::MediaExtensions;
pub use sanitize::{SanitizedPath, sanitize_path};

mod analyze;
mod error;
mod extract;
mod media;
mod sanitize;
