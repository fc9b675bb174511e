use std::future::Future;
use std::path::Path;

use crate::error::Result;
use crate::types::{ChatId, FileRef, MessageRef, StatusHandle};

/// Asynchronous messaging transport.
///
/// The minimal surface the job pipeline needs. Implementations own their
/// timeouts; a call that times out is reported as an error like any other.
pub trait Transport: Send + Sync {
    /// Copy `origin` into chat `to`.
    fn forward(&self, to: ChatId, origin: MessageRef) -> impl Future<Output = Result<()>> + Send;

    /// Send a message that can be edited later.
    fn send_status(
        &self,
        chat: ChatId,
        text: &str,
    ) -> impl Future<Output = Result<StatusHandle>> + Send;

    fn edit_status(
        &self,
        handle: StatusHandle,
        text: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Download `file` to exactly `dest`.
    fn download_to_path(
        &self,
        file: &FileRef,
        dest: &Path,
    ) -> impl Future<Output = Result<()>> + Send;

    fn upload_file(&self, chat: ChatId, path: &Path) -> impl Future<Output = Result<()>> + Send;

    fn send_text(&self, chat: ChatId, text: &str) -> impl Future<Output = Result<()>> + Send;
}
