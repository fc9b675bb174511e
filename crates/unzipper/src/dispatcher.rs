//! Long-poll loop turning Bot API updates into jobs.

use std::sync::Arc;
use std::time::Duration;

use unzipper_job::{JobContext, JobPool};
use unzipper_transport::telegram::{Message, Update};
use unzipper_transport::{ChatId, TelegramClient};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// What to do with one inbound message.
#[derive(Debug)]
enum Route {
    Welcome { chat: ChatId, text: String },
    Job(JobContext),
    Ignore,
}

fn route(message: &Message) -> Route {
    if message.is_command("/start") {
        let requester = message.requester();
        return Route::Welcome {
            chat: requester.chat,
            text: welcome(&requester.display_name),
        };
    }

    match &message.document {
        Some(document) => {
            let archive = document.file_ref();
            if archive.is_zip() {
                Route::Job(JobContext {
                    requester: message.requester(),
                    origin: message.message_ref(),
                    archive,
                })
            } else {
                Route::Ignore
            }
        }
        None => Route::Ignore,
    }
}

fn welcome(name: &str) -> String {
    format!("Hi {name}! Send me a ZIP file. I will analyze it, unzip it, and send the contents back to you.")
}

pub struct Dispatcher {
    client: Arc<TelegramClient>,
    pool: JobPool<TelegramClient>,
    poll_timeout: Duration,
    offset: Option<i64>,
}

impl Dispatcher {
    pub fn new(client: Arc<TelegramClient>, pool: JobPool<TelegramClient>, poll_timeout: Duration) -> Self {
        Self {
            client,
            pool,
            poll_timeout,
            offset: None,
        }
    }

    /// Poll until Ctrl-C, then wait for running jobs.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(tokio::signal::ctrl_c()).await
    }

    /// Poll until `shutdown` completes, confirm the last batch of updates,
    /// then wait for running jobs.
    pub async fn run_until<F: Future>(mut self, shutdown: F) -> anyhow::Result<()> {
        tokio::pin!(shutdown);
        tracing::info!("polling for updates");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                polled = self.client.get_updates(self.offset, self.poll_timeout) => match polled {
                    Ok(updates) => {
                        for update in updates {
                            self.dispatch(update).await;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, retry_in = ?RETRY_DELAY, "polling failed");
                        tokio::select! {
                            _ = &mut shutdown => break,
                            _ = tokio::time::sleep(RETRY_DELAY) => {}
                        }
                    }
                },
            }
        }

        self.confirm_offset().await;
        tracing::info!(in_flight = self.pool.in_flight(), "shutting down");
        self.pool.shutdown().await;
        Ok(())
    }

    /// Updates are acknowledged only by the next `getUpdates` carrying the
    /// advanced offset; without it the last batch is redelivered on restart.
    async fn confirm_offset(&self) {
        let Some(offset) = self.offset else {
            return;
        };
        match self.client.get_updates(Some(offset), Duration::ZERO).await {
            Ok(_) => tracing::debug!(offset, "confirmed processed updates"),
            Err(e) => tracing::warn!(offset, error = %e, "could not confirm processed updates"),
        }
    }

    async fn dispatch(&mut self, update: Update) {
        self.offset = Some(update.update_id + 1);
        let Some(message) = update.message else {
            return;
        };

        match route(&message) {
            Route::Welcome { chat, text } => {
                if let Err(e) = self.client.send_message(chat, &text).await {
                    tracing::warn!(chat = %chat, error = %e, "could not send welcome");
                }
            }
            Route::Job(ctx) => {
                tracing::debug!(update_id = update.update_id, archive = %ctx.archive.file_name, "job submitted");
                self.pool.submit(ctx);
            }
            Route::Ignore => {
                tracing::trace!(update_id = update.update_id, "ignored update");
            }
        }
    }
}
