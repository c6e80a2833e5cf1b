//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::daemon::RunMode;

/// FANBOX archival daemon CLI.
#[derive(Parser, Debug)]
#[command(
    name = "fanboxd",
    version,
    about = "Archive content from pixiv FANBOX creators",
    long_about = "A daemon that archives posts and media from the pixiv FANBOX creators you support.\n\n\
                  Runs once, runs as a polling daemon, or downloads specific posts/creators."
)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// FANBOXSESSID cookie value.
    #[arg(long = "fanbox-session-id", env = "FANBOX_SESSION_ID")]
    pub fanbox_session_id: Option<String>,

    /// Run as a daemon, polling for updated posts.
    #[arg(long, conflicts_with = "no_daemon")]
    pub daemon: bool,

    /// Don't run as a daemon.
    #[arg(long)]
    pub no_daemon: bool,

    /// Download everything accessible before the daemon starts.
    #[arg(long, conflicts_with = "no_download_fanbox")]
    pub download_fanbox: bool,

    /// Don't download everything before the daemon starts.
    #[arg(long)]
    pub no_download_fanbox: bool,

    /// Seconds between two update polls (daemon mode only).
    #[arg(long)]
    pub interval: Option<u64>,

    /// Directory to store downloaded content.
    #[arg(long = "download-dir")]
    pub download_dir: Option<PathBuf>,

    /// Proxy server, scheme://host:port (http or socks5).
    #[arg(long, env = "https_proxy")]
    pub proxy: Option<String>,

    /// Download specific post id(s), comma separated, then exit.
    #[arg(
        long = "download-post",
        value_delimiter = ',',
        conflicts_with = "download_creator"
    )]
    pub download_post: Option<Vec<String>>,

    /// Download all posts of specific creator id(s), comma separated, then exit.
    #[arg(long = "download-creator", value_delimiter = ',')]
    pub download_creator: Option<Vec<String>>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// The run mode this invocation asks for.
    pub fn run_mode(&self) -> RunMode {
        if let Some(post_ids) = &self.download_post {
            RunMode::DownloadPosts(post_ids.clone())
        } else if let Some(creator_ids) = &self.download_creator {
            RunMode::DownloadCreators(creator_ids.clone())
        } else {
            RunMode::Normal
        }
    }

    /// Merge CLI arguments into an existing config, overriding where
    /// specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(session_id) = self.fanbox_session_id {
            config.fanbox_session_id = session_id;
        }

        if self.daemon {
            config.as_daemon = true;
        }
        if self.no_daemon {
            config.as_daemon = false;
        }

        if self.download_fanbox {
            config.download_fanbox = true;
        }
        if self.no_download_fanbox {
            config.download_fanbox = false;
        }

        if let Some(interval) = self.interval {
            config.interval = interval;
        }

        if let Some(download_dir) = self.download_dir {
            config.download_dir = download_dir;
        }

        if let Some(proxy) = self.proxy {
            config.proxy = Some(proxy);
        }

        // Targeted downloads are one-shot jobs.
        if self.download_post.is_some() || self.download_creator.is_some() {
            config.as_daemon = false;
        }
    }
}
