//! Daemon assembly and lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{build_client, ClientKind, FanboxApi, FanboxClient};
use crate::config::{Config, ProxyConfig};
use crate::download::{DownloadResult, Downloader};
use crate::error::Result;
use crate::monitor::Monitor;

/// What a single invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Optional full download, then the monitor loop when daemon mode is on.
    Normal,
    /// Download specific posts, then exit.
    DownloadPosts(Vec<String>),
    /// Download all posts of specific creators, then exit.
    DownloadCreators(Vec<String>),
}

/// The assembled daemon: serialized API lane, downloader and monitor wired
/// to one cancellation token.
pub struct FanboxD {
    config: Config,
    downloader: Downloader,
    monitor: Monitor,
    cancel: CancellationToken,
}

impl FanboxD {
    /// Build the HTTP clients and the API worker from a resolved
    /// configuration.
    pub fn new(config: Config) -> Result<Self> {
        let proxy = config
            .proxy
            .as_deref()
            .map(ProxyConfig::parse)
            .transpose()?;

        let api_http = build_client(&config.fanbox_session_id, ClientKind::Api, proxy.as_ref())?;
        let download_http = build_client(
            &config.fanbox_session_id,
            ClientKind::Download,
            proxy.as_ref(),
        )?;

        let cancel = CancellationToken::new();
        let api: Arc<dyn FanboxApi> = Arc::new(FanboxClient::new(api_http, cancel.child_token()));
        let downloader = Downloader::new(
            Arc::clone(&api),
            download_http,
            config.download_dir.clone(),
        );
        let monitor = Monitor::new(
            api,
            downloader.clone(),
            Duration::from_secs(config.interval),
        );

        Ok(Self {
            config,
            downloader,
            monitor,
            cancel,
        })
    }

    /// Run the requested mode until it finishes or [`FanboxD::stop`] is
    /// called. Returns the aggregate result of whatever was downloaded.
    pub async fn start(&self, mode: RunMode) -> DownloadResult {
        tracing::info!("Starting fanboxd version {}", env!("CARGO_PKG_VERSION"));

        let work = async {
            match mode {
                RunMode::DownloadPosts(post_ids) => {
                    self.downloader.download_posts(&post_ids).await
                }
                RunMode::DownloadCreators(creator_ids) => {
                    self.downloader.download_creators(&creator_ids).await
                }
                RunMode::Normal => {
                    let mut result = DownloadResult::Success;
                    if self.config.download_fanbox {
                        result = self.downloader.download_all().await;
                    }
                    if self.config.as_daemon {
                        self.monitor.run(self.cancel.child_token()).await;
                    }
                    result
                }
            }
        };

        // Dropping the unfinished work future on cancellation aborts every
        // in-flight fan-out task it owns.
        tokio::select! {
            biased;
            result = work => result,
            _ = self.cancel.cancelled() => {
                tracing::info!("Run aborted");
                DownloadResult::Failed
            }
        }
    }

    /// Stop the monitor, the API worker with its rate-limiter ticker, and
    /// any in-flight downloads.
    pub fn stop(&self) {
        tracing::info!("Shutting down fanboxd");
        self.cancel.cancel();
    }
}
