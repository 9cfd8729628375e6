//! HTTP delivery of playback interactions.
//!
//! Bridges the playback engine's fire-and-forget interaction stream onto
//! the backend's `/interactions` endpoint. Delivery failures are logged
//! and dropped; the engine never waits on or hears about them.

use crate::client::ChimeServerClient;
use chime_playback::{Interaction, InteractionSink};
use reqwest::Client;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Interaction sink that posts each interaction to the backend.
///
/// Each `record` call spawns a detached request on the captured runtime;
/// the call itself never blocks.
pub struct HttpInteractionSink {
    http: Client,
    endpoint: String,
    runtime: Handle,
}

impl HttpInteractionSink {
    /// Create a sink bound to the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime; use [`Self::with_handle`]
    /// when the runtime handle comes from elsewhere.
    pub fn new(client: &ChimeServerClient) -> Self {
        Self::with_handle(client, Handle::current())
    }

    /// Create a sink that spawns its requests on `runtime`.
    pub fn with_handle(client: &ChimeServerClient, runtime: Handle) -> Self {
        Self {
            http: client.http().clone(),
            endpoint: format!("{}/interactions", client.url()),
            runtime,
        }
    }
}

impl InteractionSink for HttpInteractionSink {
    fn record(&mut self, interaction: Interaction) {
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();

        self.runtime.spawn(async move {
            debug!(
                song_id = %interaction.track_id,
                kind = interaction.kind.as_str(),
                "Recording interaction"
            );

            let result = http.post(&endpoint).json(&interaction).send().await;
            match result {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    // Best-effort by contract: log and move on
                    warn!(
                        status = response.status().as_u16(),
                        kind = interaction.kind.as_str(),
                        "Interaction rejected by server"
                    );
                }
                Err(e) => {
                    warn!(error = %e, kind = interaction.kind.as_str(), "Failed to record interaction");
                }
            }
        });
    }
}
