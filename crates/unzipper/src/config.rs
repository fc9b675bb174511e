use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use unzipper_job::JobConfig;

/// Top-level config file.
///
/// ```toml
/// [telegram]
/// token = "123:abc"
/// poll_timeout_secs = 30
///
/// [job]
/// download_root = "/var/lib/unzipper/downloads"
/// extract_root = "/var/lib/unzipper/extracted"
/// audit_chat = -1001234567890
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub job: JobConfig,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelegramConfig {
    pub token: Option<String>,
    /// Bot API server, e.g. a self-hosted one.
    pub api_base: Option<String>,
    pub poll_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Bound on a single file download or upload.
    pub transfer_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: None,
            poll_timeout_secs: 30,
            request_timeout_secs: 60,
            transfer_timeout_secs: 600,
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("transfer_timeout_secs", &self.transfer_timeout_secs)
            .finish()
    }
}

impl TelegramConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_secs(self.transfer_timeout_secs)
    }

    /// Token from the command line or environment, else from the file.
    pub fn resolve_token(&self, cli: Option<String>) -> anyhow::Result<String> {
        cli.or_else(|| self.token.clone())
            .filter(|token| !token.trim().is_empty())
            .context("no bot token: pass --token, set UNZIPPER_BOT_TOKEN, or set telegram.token")
    }
}

impl AppConfig {
    /// Load from `path`, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config '{}'", path.display()))
    }

    fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
