//! fanboxd - a content archival daemon for pixiv FANBOX.
//!
//! This library archives posts and media from the FANBOX creators a session
//! supports.
//!
//! # Features
//!
//! - One-shot batch download of every supported creator
//! - Polling daemon that picks up newly-updated posts
//! - Targeted download of specific posts or creators
//! - Rate-limited, serialized API access with retry
//! - Post metadata archived as pretty-printed JSON plus a text transcript
//! - Legacy HTML posts handled alongside block-formatted posts
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use fanboxd::{Config, FanboxD, RunMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.json"))?;
//!     let fanboxd = FanboxD::new(config)?;
//!     fanboxd.start(RunMode::Normal).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod content;
pub mod daemon;
pub mod download;
pub mod error;
pub mod fs;
pub mod monitor;
pub mod output;

// Re-exports for convenience
pub use api::{FanboxApi, FanboxClient};
pub use config::Config;
pub use daemon::{FanboxD, RunMode};
pub use download::{DownloadResult, Downloader};
pub use error::{Error, Result};
pub use monitor::Monitor;
