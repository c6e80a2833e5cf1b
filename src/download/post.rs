//! Per-post download: metadata persistence plus concurrent media fetches.

use std::path::{Path, PathBuf};

use tokio::task::JoinSet;

use crate::api::types::PostWithRaw;
use crate::content::{resolve, ResolvedContent};
use crate::download::result::DownloadResult;
use crate::download::transcript::render_transcript;
use crate::download::Downloader;
use crate::fs::{
    filename_from_url, files_dir, images_dir, media_filename, post_dir, thumbnails_dir,
};

impl Downloader {
    /// Download one post: persist its metadata and fetch the cover and
    /// every attached media item concurrently.
    pub(crate) async fn download_post(&self, post_id: &str) -> DownloadResult {
        tracing::info!("Post {}: starting download", post_id);

        let Some(post) = self.api.post(post_id).await else {
            tracing::error!("Failed to get post {}", post_id);
            return DownloadResult::Failed;
        };

        let dir = post_dir(&self.download_dir, &post.body.creator_id, post_id);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            tracing::error!(
                "Post {}: failed to create directory {}: {}",
                post_id,
                dir.display(),
                e
            );
            return DownloadResult::Failed;
        }

        // Metadata is a best-effort side channel: write failures are logged
        // and excluded from the post's folded result.
        let metadata = tokio::spawn(write_metadata(dir.clone(), post.clone()));

        let result = self.download_post_media(&post, &dir).await;

        let _ = metadata.await;
        tracing::info!("Post {}: done, result is {}", post_id, result);
        result
    }

    /// Fan out the post's binary downloads and fold their outcomes.
    async fn download_post_media(&self, post: &PostWithRaw, dir: &Path) -> DownloadResult {
        let body = &post.body;
        let post_id = body.id.as_str();

        let Some(content) = &body.body else {
            tracing::error!("No access permission to post {}", post_id);
            return DownloadResult::Failed;
        };

        let mut tasks: JoinSet<bool> = JoinSet::new();

        if let Some(cover_url) = &body.cover_image_url {
            tracing::info!("Post {}: downloading cover", post_id);
            self.spawn_download(&mut tasks, cover_url, dir.to_path_buf(), "cover.png", post_id);
        }

        match resolve(content) {
            ResolvedContent::Structured { images, files } => {
                if images.is_empty() {
                    tracing::info!("No images for post {} found, skipping them", post_id);
                }
                let image_dir = images_dir(dir);
                let thumbnail_dir = thumbnails_dir(dir);
                for (index, image) in images.iter().enumerate() {
                    let name = media_filename(&image.id, &image.extension);
                    tracing::info!(
                        "Post {}: downloading image [{}/{}] {}",
                        post_id,
                        index + 1,
                        images.len(),
                        name
                    );
                    self.spawn_download(
                        &mut tasks,
                        &image.thumbnail_url,
                        thumbnail_dir.clone(),
                        &name,
                        post_id,
                    );
                    self.spawn_download(
                        &mut tasks,
                        &image.original_url,
                        image_dir.clone(),
                        &name,
                        post_id,
                    );
                }

                if files.is_empty() {
                    tracing::info!("No files for post {} found, skipping them", post_id);
                }
                let file_dir = files_dir(dir);
                for (index, file) in files.iter().enumerate() {
                    let name = media_filename(&file.id, &file.extension);
                    tracing::info!(
                        "Post {}: downloading file [{}/{}] {}",
                        post_id,
                        index + 1,
                        files.len(),
                        name
                    );
                    self.spawn_download(&mut tasks, &file.url, file_dir.clone(), &name, post_id);
                }
            }
            ResolvedContent::Legacy {
                file_urls,
                thumbnail_urls,
                ..
            } => {
                let thumbnail_dir = thumbnails_dir(dir);
                for url in &thumbnail_urls {
                    let name = filename_from_url(url);
                    self.spawn_download(&mut tasks, url, thumbnail_dir.clone(), &name, post_id);
                }
                let file_dir = files_dir(dir);
                for url in &file_urls {
                    let name = filename_from_url(url);
                    self.spawn_download(&mut tasks, url, file_dir.clone(), &name, post_id);
                }
            }
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            outcomes.push(joined.unwrap_or(false));
        }
        DownloadResult::fold_flags(outcomes)
    }

    fn spawn_download(
        &self,
        tasks: &mut JoinSet<bool>,
        url: &str,
        dest_dir: PathBuf,
        filename: &str,
        post_id: &str,
    ) {
        let client = self.http.clone();
        let url = url.to_string();
        let filename = filename.to_string();
        let post_id = post_id.to_string();
        tasks.spawn(async move {
            crate::download::file::download_file(&client, &url, &dest_dir, &post_id, &filename)
                .await
        });
    }
}

/// Persist the post's metadata: the original payload pretty-printed (a
/// stable `post.json` plus a timestamped snapshot) and a plain-text
/// transcript (timestamped, then copied to a stable `post_content.txt`).
async fn write_metadata(dir: PathBuf, post: PostWithRaw) {
    let post_id = post.body.id.clone();
    let time_string = post.body.updated_datetime.replace(':', "-");

    let pretty = match serde_json::from_str::<serde_json::Value>(&post.raw)
        .and_then(|value| serde_json::to_string_pretty(&value))
    {
        Ok(pretty) => pretty,
        Err(e) => {
            tracing::warn!("Post {}: could not pretty-print payload: {}", post_id, e);
            post.raw.clone()
        }
    };

    write_text(&dir.join("post.json"), &pretty, &post_id).await;
    write_text(
        &dir.join(format!("post-{}.json", time_string)),
        &pretty,
        &post_id,
    )
    .await;

    let transcript = render_transcript(&post.body);
    let timestamped = dir.join(format!("post-{}-content.txt", time_string));
    write_text(&timestamped, &transcript, &post_id).await;
    if let Err(e) = tokio::fs::copy(&timestamped, dir.join("post_content.txt")).await {
        tracing::error!(
            "Failed to write post content file for post {}: {}",
            post_id,
            e
        );
    }
}

async fn write_text(path: &Path, content: &str, post_id: &str) {
    if let Err(e) = tokio::fs::write(path, content).await {
        tracing::error!(
            "Failed to write {} for post {}: {}",
            path.display(),
            post_id,
            e
        );
    }
}
