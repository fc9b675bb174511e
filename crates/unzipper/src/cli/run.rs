use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use unzipper_job::{JobPool, JobRunner};
use unzipper_transport::TelegramClient;

use crate::config::AppConfig;
use crate::dispatcher::Dispatcher;
use crate::logging;

#[derive(Clone, Debug, Args)]
pub struct RunArg {
    /// TOML config file with `[telegram]` and `[job]` sections.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Bot token. Overrides `telegram.token` from the config file.
    #[arg(long, env = "UNZIPPER_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    #[arg(short, long)]
    pub verbose: bool,
}

pub async fn execute(args: RunArg) -> anyhow::Result<()> {
    logging::init(args.verbose);

    let config = AppConfig::load(args.config.as_deref())?;
    let token = config.telegram.resolve_token(args.token)?;

    let mut client = TelegramClient::new(token)
        .context("failed to build HTTP client")?
        .request_timeout(config.telegram.request_timeout())
        .transfer_timeout(config.telegram.transfer_timeout());
    if let Some(api_base) = &config.telegram.api_base {
        client = client.api_base(api_base);
    }

    let me = client.get_me().await.context("failed to reach the Bot API")?;
    tracing::info!(
        bot = me.username.as_deref().unwrap_or(&me.first_name),
        "connected"
    );

    let job = Arc::new(config.job);
    job.roots()
        .ensure()
        .context("failed to create workspace roots")?;
    tracing::info!(
        download_root = %job.download_root.display(),
        extract_root = %job.extract_root.display(),
        max_concurrent_jobs = job.max_concurrent_jobs,
        "workspace ready"
    );

    let client = Arc::new(client);
    let pool = JobPool::new(
        JobRunner::new(Arc::clone(&client), Arc::clone(&job)),
        job.max_concurrent_jobs,
    );

    Dispatcher::new(client, pool, config.telegram.poll_timeout())
        .run()
        .await
}
