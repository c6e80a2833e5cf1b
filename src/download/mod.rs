//! Download module for content archiving.
//!
//! This module provides:
//! - Tri-state result folding
//! - The creators → pages → posts → media traversal
//! - Per-post metadata persistence
//! - Streaming media downloads

pub mod file;
pub mod post;
pub mod result;
pub mod transcript;

pub use result::DownloadResult;

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use tokio::task::JoinSet;

use crate::api::FanboxApi;

/// Drives the whole download traversal.
///
/// Every level fans out its children as concurrent tasks, joins them, and
/// folds their outcomes; a failure in one branch never cancels its
/// siblings. Cheap to clone.
#[derive(Clone)]
pub struct Downloader {
    pub(crate) api: Arc<dyn FanboxApi>,
    pub(crate) http: Client,
    pub(crate) download_dir: PathBuf,
}

impl Downloader {
    pub fn new(api: Arc<dyn FanboxApi>, http: Client, download_dir: PathBuf) -> Self {
        Self {
            api,
            http,
            download_dir,
        }
    }

    /// Download everything from every creator the session supports.
    pub async fn download_all(&self) -> DownloadResult {
        tracing::info!("Starting downloader");
        tracing::info!("Getting supporting creators");

        let Some(creators) = self.api.supporting_creators().await else {
            tracing::error!("Could not get supporting creators. Aborting download");
            return DownloadResult::Failed;
        };

        let creator_ids: Vec<String> = creators
            .into_iter()
            .map(|creator| creator.creator_id)
            .collect();
        let result = self.download_creators(&creator_ids).await;
        tracing::info!("All downloads done! Result is {}", result);
        result
    }

    /// Download every post of the given creators.
    pub async fn download_creators(&self, creator_ids: &[String]) -> DownloadResult {
        let mut tasks = JoinSet::new();
        for creator_id in creator_ids {
            let downloader = self.clone();
            let creator_id = creator_id.clone();
            tasks.spawn(async move { downloader.download_creator(&creator_id).await });
        }
        join_fold(tasks).await
    }

    /// Download every post of one creator, page by page.
    pub async fn download_creator(&self, creator_id: &str) -> DownloadResult {
        tracing::info!("Downloading posts from creator {}", creator_id);

        let Some(pages) = self.api.creator_post_pages(creator_id).await else {
            tracing::error!(
                "Could not get post pages for creator {}. Aborting download",
                creator_id
            );
            return DownloadResult::Failed;
        };

        let mut tasks = JoinSet::new();
        for page_url in pages {
            let downloader = self.clone();
            tasks.spawn(async move { downloader.download_page(&page_url).await });
        }
        let result = join_fold(tasks).await;
        tracing::info!("Download done for creator {}, result is {}", creator_id, result);
        result
    }

    /// Download every accessible post listed on one page.
    async fn download_page(&self, page_url: &str) -> DownloadResult {
        tracing::info!("Downloading page {}", page_url);

        let Some(summaries) = self.api.posts_page(page_url).await else {
            tracing::error!("Failed to get page {}", page_url);
            return DownloadResult::Failed;
        };

        let post_ids: Vec<String> = summaries
            .into_iter()
            .filter(|summary| {
                if summary.is_restricted {
                    tracing::info!("No access to post {}, skipping it", summary.id);
                    false
                } else {
                    true
                }
            })
            .map(|summary| summary.id)
            .collect();

        let result = self.download_posts(&post_ids).await;
        tracing::info!("Download done for page {}, result is {}", page_url, result);
        result
    }

    /// Download a fixed set of posts.
    pub async fn download_posts(&self, post_ids: &[String]) -> DownloadResult {
        let mut tasks = JoinSet::new();
        for post_id in post_ids {
            let downloader = self.clone();
            let post_id = post_id.clone();
            tasks.spawn(async move { downloader.download_post(&post_id).await });
        }
        join_fold(tasks).await
    }
}

/// Await every spawned child and fold the outcomes. A panicked or aborted
/// child counts as a failure.
async fn join_fold(mut tasks: JoinSet<DownloadResult>) -> DownloadResult {
    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.unwrap_or(DownloadResult::Failed));
    }
    DownloadResult::fold(results)
}
