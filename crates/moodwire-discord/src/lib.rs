// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord message source for the Moodwire chat monitor.
//!
//! Implements [`MessageSource`] by polling the Discord REST API for new
//! channel messages. A background task fetches on a fixed interval,
//! deduplicates by snowflake (the `after` query parameter), and forwards
//! observed messages to an mpsc channel that `next()` reads from.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use moodwire_config::model::DiscordConfig;
use moodwire_core::{
    Adapter, AdapterType, HealthStatus, MessageSource, MoodwireError, RawMessage,
};

/// Base URL for the Discord REST API.
const API_BASE_URL: &str = "https://discord.com/api/v10";

/// One message as returned by the channel messages endpoint. Only the
/// fields the monitor observes; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
struct DiscordMessage {
    id: String,
    content: String,
    timestamp: String,
    author: DiscordAuthor,
}

#[derive(Debug, Clone, Deserialize)]
struct DiscordAuthor {
    username: String,
}

/// Discord channel message source implementing [`MessageSource`].
///
/// `connect()` spawns the polling task; `next()` suspends on the inbound
/// channel. If the poll task hits an unrecoverable API error (invalid
/// token, missing channel) it exits, and `next()` reports a fatal source
/// error so the pipeline drains.
pub struct DiscordSource {
    config: DiscordConfig,
    client: reqwest::Client,
    base_url: String,
    inbound_rx: Mutex<mpsc::Receiver<RawMessage>>,
    /// Taken by `connect()`; the polling task holds the only sender, so
    /// `next()` sees a closed channel as soon as polling ends.
    inbound_tx: Option<mpsc::Sender<RawMessage>>,
    cancel: CancellationToken,
    polling_handle: Option<JoinHandle<()>>,
}

impl DiscordSource {
    /// Creates a new Discord source.
    ///
    /// Requires `config.token` and `config.channel_id` to be set.
    pub fn new(config: DiscordConfig) -> Result<Self, MoodwireError> {
        let token = config.token.as_deref().ok_or_else(|| {
            MoodwireError::Config("discord.token is required for the Discord source".into())
        })?;
        if token.is_empty() {
            return Err(MoodwireError::Config("discord.token cannot be empty".into()));
        }
        if config.channel_id.as_deref().unwrap_or("").is_empty() {
            return Err(MoodwireError::Config(
                "discord.channel_id is required for the Discord source".into(),
            ));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let auth = format!("Bot {token}");
        headers.insert(
            "authorization",
            reqwest::header::HeaderValue::from_str(&auth)
                .map_err(|e| MoodwireError::Config(format!("invalid discord token: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MoodwireError::Internal(format!("failed to build HTTP client: {e}")))?;

        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            config,
            client,
            base_url: API_BASE_URL.to_string(),
            inbound_rx: Mutex::new(inbound_rx),
            inbound_tx: Some(inbound_tx),
            cancel: CancellationToken::new(),
            polling_handle: None,
        })
    }

    /// Overrides the API base URL (for testing with a mock server).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Adapter for DiscordSource {
    fn name(&self) -> &str {
        "discord"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, MoodwireError> {
        // Validate the token by fetching the bot's own user.
        let url = format!("{}/users/@me", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(response) => Ok(HealthStatus::Unhealthy(format!(
                "discord API returned {}",
                response.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("discord unreachable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), MoodwireError> {
        debug!("discord source shutting down");
        self.cancel.cancel();
        Ok(())
    }
}

#[async_trait]
impl MessageSource for DiscordSource {
    async fn connect(&mut self) -> Result<(), MoodwireError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let client = self.client.clone();
        let tx = self
            .inbound_tx
            .take()
            .ok_or_else(|| MoodwireError::Internal("discord source already connected".into()))?;
        let cancel = self.cancel.clone();
        let channel_id = self
            .config
            .channel_id
            .clone()
            .ok_or_else(|| MoodwireError::Config("discord.channel_id is required".into()))?;
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let limit = self.config.fetch_limit;

        info!(channel_id = channel_id.as_str(), "starting Discord channel polling");

        let handle = tokio::spawn(async move {
            poll_loop(client, url, interval, limit, tx, cancel).await;
        });
        self.polling_handle = Some(handle);

        Ok(())
    }

    async fn next(&self) -> Result<RawMessage, MoodwireError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| MoodwireError::fatal_source("discord polling task ended"))
    }
}

/// Polling loop: fetch new messages, forward them oldest-first, advance the
/// `after` cursor. Exits on cancellation, an unrecoverable API status, or a
/// dropped receiver.
async fn poll_loop(
    client: reqwest::Client,
    url: String,
    interval: Duration,
    limit: u8,
    tx: mpsc::Sender<RawMessage>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut after: Option<String> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("discord polling cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        let mut request = client.get(&url).query(&[("limit", limit.to_string())]);
        if let Some(ref cursor) = after {
            request = request.query(&[("after", cursor.clone())]);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "discord poll request failed, will retry");
                continue;
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::NOT_FOUND
        {
            error!(status = %status, "unrecoverable discord API error, stopping polling");
            return;
        }
        if !status.is_success() {
            warn!(status = %status, "discord poll returned error status, will retry");
            continue;
        }

        // Parse items individually so one malformed entry is skipped
        // without losing the rest of the batch.
        let items: Vec<serde_json::Value> = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "malformed discord response body, will retry");
                continue;
            }
        };

        // The API returns newest-first; forward in chat order.
        for item in items.into_iter().rev() {
            let msg: DiscordMessage = match serde_json::from_value(item) {
                Ok(m) => m,
                Err(e) => {
                    warn!(error = %e, "skipping malformed discord message");
                    continue;
                }
            };

            after = Some(msg.id.clone());
            let raw = RawMessage {
                text: msg.content,
                author: msg.author.username,
                timestamp: msg.timestamp,
                source_id: Some(msg.id),
            };
            if tx.send(raw).await.is_err() {
                debug!("inbound receiver dropped, stopping discord polling");
                return;
            }
        }
    }
}
