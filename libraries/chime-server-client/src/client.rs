//! Main Chime backend client.

use crate::error::{Result, ServerClientError};
use crate::types::{RecommendedResponse, RemoteSong, ServerConfig, SongResponse, TrendingResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Client for the Chime Player backend API.
///
/// Serves the catalog surfaces: the recommendation feed the home screen
/// renders, and single-song lookup for deep links.
///
/// # Example
///
/// ```ignore
/// use chime_server_client::{ChimeServerClient, ServerConfig};
///
/// let config = ServerConfig::new("https://api.chime.example.com");
/// let client = ChimeServerClient::new(config)?;
///
/// // Fetch the recommendation feed
/// let songs = client.recommended(1).await?;
/// println!("Got {} songs", songs.len());
///
/// // Look up one song for a deep link
/// let song = client.song_by_id("abc123").await?;
/// ```
pub struct ChimeServerClient {
    http: Client,
    base_url: String,
}

impl ChimeServerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let base_url = config.url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        // HTTP client with reasonable defaults
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("ChimePlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServerClientError::Request)?;

        Ok(Self { http, base_url })
    }

    /// Get the server base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a page of the recommendation feed.
    ///
    /// Pages are 1-based. The backend decides page size and ordering.
    pub async fn recommended(&self, page: u32) -> Result<Vec<RemoteSong>> {
        let url = format!("{}/recommended?page={}", self.base_url, page);
        debug!(url = %url, "Fetching recommendation feed");

        let response = self.http.get(&url).send().await.map_err(|e| {
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

        let feed: RecommendedResponse = response.json().await.map_err(|e| {
            ServerClientError::ParseError(format!("Failed to parse recommendation feed: {}", e))
        })?;

        info!(page, count = feed.recommended.len(), "Fetched recommendations");
        Ok(feed.recommended)
    }

    /// Fetch the trending songs list.
    pub async fn trending(&self) -> Result<Vec<RemoteSong>> {
        let url = format!("{}/trending", self.base_url);
        debug!(url = %url, "Fetching trending songs");

        let response = self.http.get(&url).send().await.map_err(|e| {
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

        let feed: TrendingResponse = response.json().await.map_err(|e| {
            ServerClientError::ParseError(format!("Failed to parse trending list: {}", e))
        })?;

        Ok(feed.trending)
    }

    /// Look up a single song by its id.
    pub async fn song_by_id(&self, song_id: &str) -> Result<RemoteSong> {
        let url = format!("{}/song/{}", self.base_url, song_id);
        debug!(url = %url, song_id = %song_id, "Fetching song");

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ServerClientError::ServerUnreachable(e.to_string())
            } else {
                ServerClientError::Request(e)
            }
        })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ServerClientError::SongNotFound(song_id.to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: SongResponse = response.json().await.map_err(|e| {
            ServerClientError::ParseError(format!("Failed to parse song response: {}", e))
        })?;

        Ok(body.song)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_validation() {
        // Valid URLs
        assert!(ChimeServerClient::new(ServerConfig::new("https://example.com")).is_ok());
        assert!(ChimeServerClient::new(ServerConfig::new("http://localhost:8080")).is_ok());

        // Invalid URLs
        assert!(ChimeServerClient::new(ServerConfig::new("")).is_err());
        assert!(ChimeServerClient::new(ServerConfig::new("not-a-url")).is_err());
        assert!(ChimeServerClient::new(ServerConfig::new("ftp://example.com")).is_err());
    }

    #[test]
    fn url_normalization_strips_trailing_slash() {
        let client =
            ChimeServerClient::new(ServerConfig::new("https://example.com/")).expect("valid url");
        assert_eq!(client.url(), "https://example.com");
    }
}
