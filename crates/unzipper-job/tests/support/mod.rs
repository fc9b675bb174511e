#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use unzipper_job::JobConfig;
use unzipper_transport::{
    ChatId, Error, FileRef, MessageId, MessageRef, Requester, Result, StatusHandle, Transport,
};
use zip::write::SimpleFileOptions;

pub const USER_CHAT: ChatId = ChatId(100);
pub const AUDIT_CHAT: ChatId = ChatId(-900);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Forward { to: ChatId, origin: MessageRef },
    SendStatus { chat: ChatId, text: String },
    EditStatus { handle: StatusHandle, text: String },
    Download { file_id: String, dest: PathBuf },
    Upload { chat: ChatId, name: String, size: u64 },
    SendText { chat: ChatId, text: String },
}

/// In-memory transport that records every call.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    remote_files: Mutex<HashMap<String, Vec<u8>>>,
    failing_uploads: Mutex<HashSet<String>>,
    fail_download: AtomicBool,
    fail_forward: AtomicBool,
    fail_status: AtomicBool,
    fail_text_to: Mutex<Option<ChatId>>,
    download_delay: Mutex<Duration>,
    next_message: AtomicI64,
    active_downloads: AtomicUsize,
    max_active_downloads: AtomicUsize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, file_id: &str, content: Vec<u8>) {
        self.remote_files.lock().unwrap().insert(file_id.to_string(), content);
    }

    pub fn fail_upload_of(&self, name: &str) {
        self.failing_uploads.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_downloads(&self) {
        self.fail_download.store(true, Ordering::SeqCst);
    }

    pub fn fail_forwards(&self) {
        self.fail_forward.store(true, Ordering::SeqCst);
    }

    pub fn fail_status_messages(&self) {
        self.fail_status.store(true, Ordering::SeqCst);
    }

    pub fn fail_text_to(&self, chat: ChatId) {
        *self.fail_text_to.lock().unwrap() = Some(chat);
    }

    pub fn set_download_delay(&self, delay: Duration) {
        *self.download_delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Upload { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Texts shown in `chat`, status edits included, in order.
    pub fn texts_in(&self, chat: ChatId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SendStatus { chat: c, text } | Call::SendText { chat: c, text } if c == chat => {
                    Some(text)
                }
                Call::EditStatus { handle, text } if handle.chat == chat => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn max_active_downloads(&self) -> usize {
        self.max_active_downloads.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Transport for RecordingTransport {
    async fn forward(&self, to: ChatId, origin: MessageRef) -> Result<()> {
        self.record(Call::Forward { to, origin });
        if self.fail_forward.load(Ordering::SeqCst) {
            return Err(Error::Other("forward refused".into()));
        }
        Ok(())
    }

    async fn send_status(&self, chat: ChatId, text: &str) -> Result<StatusHandle> {
        self.record(Call::SendStatus {
            chat,
            text: text.to_string(),
        });
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(Error::Other("status refused".into()));
        }
        let message = MessageId(self.next_message.fetch_add(1, Ordering::SeqCst) + 1);
        Ok(StatusHandle { chat, message })
    }

    async fn edit_status(&self, handle: StatusHandle, text: &str) -> Result<()> {
        self.record(Call::EditStatus {
            handle,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn download_to_path(&self, file: &FileRef, dest: &Path) -> Result<()> {
        self.record(Call::Download {
            file_id: file.file_id.clone(),
            dest: dest.to_path_buf(),
        });

        let active = self.active_downloads.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_downloads.fetch_max(active, Ordering::SeqCst);
        let delay = *self.download_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        self.active_downloads.fetch_sub(1, Ordering::SeqCst);

        if self.fail_download.load(Ordering::SeqCst) {
            return Err(Error::Other("download refused".into()));
        }
        let content = self
            .remote_files
            .lock()
            .unwrap()
            .get(&file.file_id)
            .cloned()
            .ok_or_else(|| Error::Other(format!("unknown file {}", file.file_id)))?;
        tokio::fs::write(dest, content)
            .await
            .map_err(|e| Error::io(dest, e))
    }

    async fn upload_file(&self, chat: ChatId, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::io(path, e))?
            .len();
        self.record(Call::Upload {
            chat,
            name: name.clone(),
            size,
        });
        if self.failing_uploads.lock().unwrap().contains(&name) {
            return Err(Error::Other(format!("upload of {name} refused")));
        }
        Ok(())
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> Result<()> {
        self.record(Call::SendText {
            chat,
            text: text.to_string(),
        });
        if *self.fail_text_to.lock().unwrap() == Some(chat) {
            return Err(Error::Other("text refused".into()));
        }
        Ok(())
    }
}

/// Build a zip in memory. Names ending in `/` become directory entries.
pub fn zip_bytes(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn write_file(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(&vec![b'x'; len]).unwrap();
}

/// Job settings rooted in `dir`, without pacing.
pub fn config_in(dir: &Path) -> JobConfig {
    JobConfig {
        download_root: dir.join("downloads"),
        extract_root: dir.join("extracted"),
        max_upload_bytes: 1024,
        pacing_ms: 0,
        ..JobConfig::default()
    }
}

pub fn requester() -> Requester {
    Requester {
        chat: USER_CHAT,
        user_id: 42,
        display_name: "Ada".to_string(),
    }
}

pub fn archive(file_id: &str, file_name: &str) -> FileRef {
    FileRef {
        file_id: file_id.to_string(),
        file_name: file_name.to_string(),
        size: None,
        mime_type: Some("application/zip".to_string()),
    }
}

pub fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).map(|mut d| d.next().is_none()).unwrap_or(true)
}
