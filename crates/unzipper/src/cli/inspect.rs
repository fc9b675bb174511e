use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use unzipper_archive::{ArchiveEntry, MediaExtensions};

use crate::config::AppConfig;
use crate::logging;

#[derive(Clone, Debug, Args)]
pub struct InspectArg {
    /// Archive to analyze.
    pub archive: PathBuf,
    /// Config file; only the `[job]` media settings are used.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: InspectArg) -> anyhow::Result<()> {
    logging::init(false);

    let config = AppConfig::load(args.config.as_deref())?;
    let report = render(&args.archive, &config.job.media(), &config.job.media_noun)?;
    print!("{report}");
    Ok(())
}

fn render(archive: &Path, media: &MediaExtensions, media_noun: &str) -> anyhow::Result<String> {
    let entries = unzipper_archive::entries(archive, media)
        .with_context(|| format!("failed to read '{}'", archive.display()))?;
    let media_count = entries.iter().filter(|e| e.is_media()).count();

    let mut out = String::new();
    writeln!(
        out,
        "{}: {} entries, {media_count} {media_noun}",
        archive.display(),
        entries.len()
    )?;
    for entry in &entries {
        writeln!(out, "  {:<5} {}", tag(entry), entry.name)?;
    }
    Ok(out)
}

fn tag(entry: &ArchiveEntry) -> &'static str {
    if entry.is_directory {
        "dir"
    } else if entry.is_media() {
        "media"
    } else {
        "file"
    }
}
