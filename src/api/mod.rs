//! FANBOX API module.
//!
//! This module provides:
//! - Rate limiting for API calls
//! - HTTP client construction with session authentication
//! - The serialized, retrying API client
//! - API response types

pub mod client;
pub mod http;
pub mod rate_limit;
pub mod types;

pub use client::{FanboxClient, API_BASE};
pub use http::{build_client, ClientKind};
pub use rate_limit::RateLimiter;
pub use types::*;

use async_trait::async_trait;

/// The read surface the downloader and monitor consume.
///
/// Every call yields `None` after the client's retries are exhausted;
/// callers treat a missing result as a terminal failure for that unit of
/// work. The cause (transport, malformed response, API-reported error) is
/// only observable in the logs.
#[async_trait]
pub trait FanboxApi: Send + Sync {
    /// List the creators the session supports.
    async fn supporting_creators(&self) -> Option<Vec<SupportingCreator>>;

    /// List the paged post-listing URLs for a creator.
    async fn creator_post_pages(&self, creator_id: &str) -> Option<Vec<String>>;

    /// Fetch one page of post summaries.
    async fn posts_page(&self, page_url: &str) -> Option<Vec<PostSummary>>;

    /// Fetch a post's full detail together with the unparsed payload.
    async fn post(&self, post_id: &str) -> Option<PostWithRaw>;

    /// List recently-touched posts across all supported creators.
    async fn recent_updates(&self) -> Option<Vec<UpdateEvent>>;
}
