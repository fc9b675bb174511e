use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

const RANDOM_LEN: usize = 12;

/// Identifier of one job, used as the directory name of its workspace.
///
/// Formatted as `<unix-seconds>-<12 hex chars>`: sortable by creation time,
/// and unique for jobs started within the same second.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    pub fn generate() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("{secs}-{}", &random[..RANDOM_LEN]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::path::Path> for JobId {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}
