//! Texts shown to the requester and the audit chat.

use std::path::Path;

use unzipper_archive::AnalysisResult;
use unzipper_transport::Requester;

use crate::orchestrator::JobSummary;

pub(crate) const RECEIVED: &str = "✅ File received. Starting download...";
pub(crate) const DOWNLOADED: &str = "📥 Download complete! Analyzing archive...";

/// Archive name without its extension.
pub(crate) fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

pub(crate) fn analysis_report(base_name: &str, analysis: &AnalysisResult, media_noun: &str) -> String {
    let (count, is_media) = analysis.headline_count();
    let noun = if is_media { media_noun } else { "files" };
    format!("✅ {base_name} ({count} {noun})\n\nNow extracting and sending the files...")
}

pub(crate) fn too_large(name: &str, max_bytes: u64) -> String {
    format!(
        "⚠️ Skipping '{name}' because it is larger than {}.",
        format_size(max_bytes)
    )
}

pub(crate) fn send_failed(name: &str) -> String {
    format!("❌ Could not send file: {name}")
}

pub(crate) fn done(base_name: &str, files_sent: usize) -> String {
    format!("✅ All done! Sent {files_sent} files from {base_name}.")
}

pub(crate) fn audit_summary(archive_name: &str, requester: &Requester, summary: &JobSummary) -> String {
    format!(
        "✅ Job Complete\n\nFile: {archive_name}\nUser: {} ({})\nTotal Files in Zip: {}\nSent to User: {} files",
        requester.display_name, requester.user_id, summary.total_entries, summary.files_sent
    )
}

/// Human-readable size using binary units, e.g. `50MB`.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB && b % GB == 0 => format!("{}GB", b / GB),
        b if b >= MB && b % MB == 0 => format!("{}MB", b / MB),
        b if b >= MB => format!("{:.1}MB", b as f64 / MB as f64),
        b if b >= KB && b % KB == 0 => format!("{}KB", b / KB),
        b if b >= KB => format!("{:.1}KB", b as f64 / KB as f64),
        b => format!("{b} bytes"),
    }
}
