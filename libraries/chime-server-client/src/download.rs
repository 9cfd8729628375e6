//! Song download operations.

use crate::client::ChimeServerClient;
use crate::error::{Result, ServerClientError};
use crate::types::DownloadProgress;
use futures_util::StreamExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

impl ChimeServerClient {
    /// Download a song's audio file to `dest_path`.
    ///
    /// The audio URI comes straight from the song metadata (it may live on
    /// a CDN, not the API host). Progress is reported as whole percentages;
    /// the callback fires at most once per percent step plus a final 100.
    pub async fn download_song<F>(
        &self,
        song_id: &str,
        audio_uri: &str,
        dest_path: &Path,
        mut progress_callback: F,
    ) -> Result<()>
    where
        F: FnMut(DownloadProgress),
    {
        debug!(song_id = %song_id, uri = %audio_uri, dest = %dest_path.display(), "Downloading song");

        let response = self.http().get(audio_uri).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ServerClientError::ServerUnreachable(e.to_string())
            } else {
                ServerClientError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let total_size = response.content_length();

        if let Some(parent) = dest_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(dest_path).await?;
        let mut downloaded: u64 = 0;
        let mut last_percent: Option<u8> = None;

        let mut stream = response.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            let percent = total_size
                .map(|total| ((downloaded * 100) / total.max(1)).min(100) as u8)
                .unwrap_or(0);

            // Only whole-percent steps reach the callback
            if last_percent != Some(percent) {
                last_percent = Some(percent);
                progress_callback(DownloadProgress {
                    song_id: song_id.to_string(),
                    bytes_received: downloaded,
                    bytes_total: total_size,
                    percent,
                });
            }
        }

        file.flush().await?;

        // The byte count is authoritative at this point even when the
        // server never sent a content length
        if last_percent != Some(100) {
            progress_callback(DownloadProgress {
                song_id: song_id.to_string(),
                bytes_received: downloaded,
                bytes_total: total_size,
                percent: 100,
            });
        }

        info!(
            song_id = %song_id,
            dest = %dest_path.display(),
            size = downloaded,
            "Song downloaded"
        );

        Ok(())
    }
}
