use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message somewhere, addressable for forwarding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageRef {
    pub chat: ChatId,
    pub message: MessageId,
}

/// A status message the bot sent and may edit later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusHandle {
    pub chat: ChatId,
    pub message: MessageId,
}

/// A remote file the transport can download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRef {
    pub file_id: String,
    pub file_name: String,
    pub size: Option<u64>,
    pub mime_type: Option<String>,
}

impl FileRef {
    pub fn is_zip(&self) -> bool {
        self.mime_type.as_deref() == Some("application/zip")
            || self
                .file_name
                .rsplit_once('.')
                .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("zip"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requester {
    pub chat: ChatId,
    pub user_id: i64,
    pub display_name: String,
}
