//! Streaming single-file download.

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Download one URL into `dest_dir/filename`.
///
/// Returns whether the file arrived without error; failures are logged with
/// the owning post id and URL and never propagate. No checksum or size
/// verification is performed.
pub async fn download_file(
    client: &Client,
    url: &str,
    dest_dir: &Path,
    post_id: &str,
    filename: &str,
) -> bool {
    let target = dest_dir.join(filename);

    if let Err(e) = tokio::fs::create_dir_all(dest_dir).await {
        tracing::error!(
            "Download failed! Post id: {}. Url: {}: could not create {}: {}",
            post_id,
            url,
            dest_dir.display(),
            e
        );
        return false;
    }

    match stream_to_file(client, url, &target).await {
        Ok(()) => {
            tracing::info!("File downloaded: {}", target.display());
            true
        }
        Err(e) => {
            tracing::error!("Download failed! Post id: {}. Url: {}: {}", post_id, url, e);
            false
        }
    }
}

/// Stream a response body to disk chunk by chunk, never holding the whole
/// payload in memory.
async fn stream_to_file(client: &Client, url: &str, target: &Path) -> Result<()> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(Error::Download(format!("HTTP {}", response.status())));
    }

    let mut file = File::create(target).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(())
}
