//! Wire types of the Telegram Bot API, limited to the fields the bot reads.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{ChatId, FileRef, MessageId, MessageRef, Requester};

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self, method: &'static str) -> Result<T> {
        if !self.ok {
            return Err(Error::Api {
                method,
                description: self
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }
        self.result.ok_or(Error::MissingField {
            method,
            field: "result",
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub document: Option<Document>,
}

impl Message {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            chat: self.chat.id,
            message: self.message_id,
        }
    }

    /// Who sent this message. Channel posts have no sender; the chat
    /// stands in for it.
    pub fn requester(&self) -> Requester {
        match &self.from {
            Some(user) => Requester {
                chat: self.chat.id,
                user_id: user.id,
                display_name: user.first_name.clone(),
            },
            None => Requester {
                chat: self.chat.id,
                user_id: self.chat.id.0,
                display_name: self.chat.title.clone().unwrap_or_default(),
            },
        }
    }

    pub fn is_command(&self, command: &str) -> bool {
        self.text
            .as_deref()
            .and_then(|t| t.split_whitespace().next())
            .map(|first| first.split('@').next() == Some(command))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub title: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
}

impl Document {
    pub fn file_ref(&self) -> FileRef {
        FileRef {
            file_id: self.file_id.clone(),
            file_name: self
                .file_name
                .clone()
                .unwrap_or_else(|| format!("{}.zip", self.file_id)),
            size: self.file_size,
            mime_type: self.mime_type.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoteFile {
    pub file_path: Option<String>,
}
