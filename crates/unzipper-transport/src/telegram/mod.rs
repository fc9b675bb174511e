//! Telegram Bot API client.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::{ChatId, FileRef, MessageRef, StatusHandle};

mod api;

pub use api::{Chat, Document, Message, Update, User};
use api::{ApiResponse, RemoteFile};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(600);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Production [`Transport`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
    request_timeout: Duration,
    transfer_timeout: Duration,
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            transfer_timeout: DEFAULT_TRANSFER_TIMEOUT,
        })
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Timeout for JSON method calls.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Upper bound on one file download or upload, body included.
    pub fn transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = timeout;
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, self.token, file_path)
    }

    async fn call<P, R>(&self, method: &'static str, params: &P, timeout: Duration) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        // Bot API errors arrive as non-2xx with a JSON envelope, so the
        // status code is not checked here.
        let response: ApiResponse<R> = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await?
            .json()
            .await?;
        response.into_result(method)
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &json!({}), self.request_timeout).await
    }

    /// Long-poll for new updates starting at `offset`.
    pub async fn get_updates(&self, offset: Option<i64>, poll_timeout: Duration) -> Result<Vec<Update>> {
        let params = json!({
            "offset": offset,
            "timeout": poll_timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        self.call("getUpdates", &params, poll_timeout + self.request_timeout)
            .await
    }

    pub async fn send_message(&self, chat: ChatId, text: &str) -> Result<Message> {
        let params = json!({ "chat_id": chat, "text": text });
        self.call("sendMessage", &params, self.request_timeout).await
    }

    async fn file_path(&self, file_id: &str) -> Result<String> {
        let file: RemoteFile = self
            .call("getFile", &json!({ "file_id": file_id }), self.request_timeout)
            .await?;
        file.file_path.ok_or(Error::MissingField {
            method: "getFile",
            field: "file_path",
        })
    }
}

impl Transport for TelegramClient {
    async fn forward(&self, to: ChatId, origin: MessageRef) -> Result<()> {
        let params = json!({
            "chat_id": to,
            "from_chat_id": origin.chat,
            "message_id": origin.message,
        });
        let _: Message = self.call("forwardMessage", &params, self.request_timeout).await?;
        Ok(())
    }

    async fn send_status(&self, chat: ChatId, text: &str) -> Result<StatusHandle> {
        let message = self.send_message(chat, text).await?;
        Ok(StatusHandle {
            chat: message.chat.id,
            message: message.message_id,
        })
    }

    async fn edit_status(&self, handle: StatusHandle, text: &str) -> Result<()> {
        let params = json!({
            "chat_id": handle.chat,
            "message_id": handle.message,
            "text": text,
        });
        // Returns the edited message, or `true` for inline messages.
        let _: serde_json::Value = self.call("editMessageText", &params, self.request_timeout).await?;
        Ok(())
    }

    async fn download_to_path(&self, file: &FileRef, dest: &Path) -> Result<()> {
        let file_path = self.file_path(&file.file_id).await?;
        let response = self
            .client
            .get(self.file_url(&file_path))
            .timeout(self.transfer_timeout)
            .send()
            .await?
            .error_for_status()?;

        let mut out = tokio::fs::File::create(dest)
            .await
            .map_err(|e| Error::io(dest, e))?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            out.write_all(&chunk).await.map_err(|e| Error::io(dest, e))?;
            written += chunk.len() as u64;
        }
        out.flush().await.map_err(|e| Error::io(dest, e))?;

        tracing::debug!(file_id = %file.file_id, bytes = written, dest = %dest.display(), "downloaded file");
        Ok(())
    }

    async fn upload_file(&self, chat: ChatId, path: &Path) -> Result<()> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| Error::io(path, e))?;
        let len = file
            .metadata()
            .await
            .map_err(|e| Error::io(path, e))?
            .len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat.to_string())
            .part(
                "document",
                reqwest::multipart::Part::stream_with_length(file, len).file_name(file_name),
            );

        let response: ApiResponse<Message> = self
            .client
            .post(self.method_url("sendDocument"))
            .timeout(self.transfer_timeout)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;
        response.into_result("sendDocument")?;
        Ok(())
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> Result<()> {
        self.send_message(chat, text).await?;
        Ok(())
    }
}
