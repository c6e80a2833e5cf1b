//! Rate-limited FANBOX API client.
//!
//! All API calls funnel through one worker task that owns the HTTP client
//! and the rate limiter, so calls execute strictly one at a time no matter
//! how many logical requests are outstanding. Callers hold a cheap handle
//! and queue requests onto the worker.

use std::future::Future;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::api::rate_limit::RateLimiter;
use crate::api::types::*;
use crate::api::FanboxApi;
use crate::error::Result;

/// FANBOX API base URL.
pub const API_BASE: &str = "https://api.fanbox.cc";

/// Total attempts per call before yielding "no result".
const MAX_ATTEMPTS: u32 = 3;

/// Pending requests buffered for the worker.
const REQUEST_QUEUE_SIZE: usize = 32;

enum ApiRequest {
    SupportingCreators {
        reply: oneshot::Sender<Option<Vec<SupportingCreator>>>,
    },
    CreatorPostPages {
        creator_id: String,
        reply: oneshot::Sender<Option<Vec<String>>>,
    },
    PostsPage {
        page_url: String,
        reply: oneshot::Sender<Option<Vec<PostSummary>>>,
    },
    Post {
        post_id: String,
        reply: oneshot::Sender<Option<PostWithRaw>>,
    },
    RecentUpdates {
        reply: oneshot::Sender<Option<Vec<UpdateEvent>>>,
    },
}

/// Handle to the serialized API worker.
#[derive(Clone)]
pub struct FanboxClient {
    tx: mpsc::Sender<ApiRequest>,
}

impl FanboxClient {
    /// Create a client and spawn its worker task. The worker stops when
    /// `cancel` fires or every handle is dropped.
    pub fn new(http: Client, cancel: CancellationToken) -> Self {
        Self::with_base_url(http, cancel, API_BASE)
    }

    /// Same as [`FanboxClient::new`] with an explicit API base URL.
    pub fn with_base_url(
        http: Client,
        cancel: CancellationToken,
        base_url: impl Into<String>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE_SIZE);
        let worker = ApiWorker {
            http,
            base_url: base_url.into(),
            limiter: RateLimiter::new(),
            rx,
            cancel,
        };
        tokio::spawn(worker.run());
        Self { tx }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Option<T>>) -> ApiRequest,
    ) -> Option<T> {
        let (reply, response) = oneshot::channel();
        if self.tx.send(make(reply)).await.is_err() {
            return None;
        }
        response.await.unwrap_or(None)
    }
}

#[async_trait]
impl FanboxApi for FanboxClient {
    async fn supporting_creators(&self) -> Option<Vec<SupportingCreator>> {
        self.request(|reply| ApiRequest::SupportingCreators { reply })
            .await
    }

    async fn creator_post_pages(&self, creator_id: &str) -> Option<Vec<String>> {
        let creator_id = creator_id.to_string();
        self.request(|reply| ApiRequest::CreatorPostPages { creator_id, reply })
            .await
    }

    async fn posts_page(&self, page_url: &str) -> Option<Vec<PostSummary>> {
        let page_url = page_url.to_string();
        self.request(|reply| ApiRequest::PostsPage { page_url, reply })
            .await
    }

    async fn post(&self, post_id: &str) -> Option<PostWithRaw> {
        let post_id = post_id.to_string();
        self.request(|reply| ApiRequest::Post { post_id, reply })
            .await
    }

    async fn recent_updates(&self) -> Option<Vec<UpdateEvent>> {
        self.request(|reply| ApiRequest::RecentUpdates { reply })
            .await
    }
}

struct ApiWorker {
    http: Client,
    base_url: String,
    limiter: RateLimiter,
    rx: mpsc::Receiver<ApiRequest>,
    cancel: CancellationToken,
}

impl ApiWorker {
    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                request = self.rx.recv() => {
                    let Some(request) = request else { break };
                    self.handle(request).await;
                }
            }
        }
        tracing::debug!("API worker stopped");
    }

    async fn handle(&self, request: ApiRequest) {
        // A dropped reply receiver just means the caller went away.
        match request {
            ApiRequest::SupportingCreators { reply } => {
                let _ = reply.send(self.supporting_creators().await);
            }
            ApiRequest::CreatorPostPages { creator_id, reply } => {
                let _ = reply.send(self.creator_post_pages(&creator_id).await);
            }
            ApiRequest::PostsPage { page_url, reply } => {
                let _ = reply.send(self.posts_page(&page_url).await);
            }
            ApiRequest::Post { post_id, reply } => {
                let _ = reply.send(self.post(&post_id).await);
            }
            ApiRequest::RecentUpdates { reply } => {
                let _ = reply.send(self.recent_updates().await);
            }
        }
    }

    async fn supporting_creators(&self) -> Option<Vec<SupportingCreator>> {
        let url = format!("{}/plan.listSupporting", self.base_url);
        let url = url.as_str();
        retry_envelope("supporting creators", move || self.get_envelope(url)).await
    }

    async fn creator_post_pages(&self, creator_id: &str) -> Option<Vec<String>> {
        let url = format!(
            "{}/post.paginateCreator?creatorId={}",
            self.base_url, creator_id
        );
        let url = url.as_str();
        retry_envelope("creator post pages", move || self.get_envelope(url)).await
    }

    async fn posts_page(&self, page_url: &str) -> Option<Vec<PostSummary>> {
        retry_envelope("posts page", move || {
            self.get_envelope::<PostsPageBody>(page_url)
        })
        .await
        .map(|body| body.items)
    }

    async fn post(&self, post_id: &str) -> Option<PostWithRaw> {
        let url = format!("{}/post.info?postId={}", self.base_url, post_id);
        let url = url.as_str();
        // The unparsed payload is kept alongside the parsed form so the
        // downloader can archive the response verbatim.
        retry_envelope("post detail", move || async move {
            let raw = self.get_text(url).await?;
            let parsed: Envelope<PostBody> = serde_json::from_str(&raw)?;
            Ok(Envelope {
                body: parsed.body.map(|body| PostWithRaw { body, raw }),
                error: parsed.error,
            })
        })
        .await
    }

    async fn recent_updates(&self) -> Option<Vec<UpdateEvent>> {
        let url = format!("{}/post.listHome?limit=30", self.base_url);
        let url = url.as_str();
        retry_envelope("recent updates", move || {
            self.get_envelope::<UpdatesBody>(url)
        })
        .await
        .map(|body| body.items)
    }

    async fn get_envelope<B: DeserializeOwned>(&self, url: &str) -> Result<Envelope<B>> {
        let raw = self.get_text(url).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.limiter.acquire().await;
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        Ok(response.text().await?)
    }
}

/// Run an API call with the flat retry policy: up to [`MAX_ATTEMPTS`] total
/// attempts, then "no result". Transport failures, malformed responses and
/// API-reported errors all end up here; only the logs distinguish them.
async fn retry_envelope<B, F, Fut>(what: &str, mut call: F) -> Option<B>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Envelope<B>>>,
{
    for attempt in 1..=MAX_ATTEMPTS {
        match call().await {
            Ok(envelope) => {
                if let Some(error) = &envelope.error {
                    tracing::warn!(
                        "API error for {} (attempt {}): {}. Consider checking your session id",
                        what,
                        attempt,
                        error
                    );
                } else if let Some(body) = envelope.body {
                    return Some(body);
                } else {
                    tracing::warn!("Empty response body for {} (attempt {})", what, attempt);
                }
            }
            Err(e) => {
                tracing::error!("Failed to fetch {} (attempt {}): {}", what, attempt, e);
            }
        }
    }
    tracing::error!("Giving up on {} after {} attempts", what, MAX_ATTEMPTS);
    None
}
