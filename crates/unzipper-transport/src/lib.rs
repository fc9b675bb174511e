//! Messaging transport seam.
//!
//! The job pipeline only talks to the outside world through [`Transport`].
//! [`TelegramClient`] is the production implementation; tests plug in
//! recording fakes.

mod error;
mod transport;
mod types;

#[cfg(feature = "telegram")]
pub mod telegram;

pub use error::{Error, Result};
pub use transport::Transport;
pub use types::{ChatId, FileRef, MessageId, MessageRef, Requester, StatusHandle};

#[cfg(feature = "telegram")]
pub use telegram::TelegramClient;
