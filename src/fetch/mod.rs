use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::ingest;
use crate::model::Snapshot;

/// Fetch failures are the one error class surfaced to the user verbatim.
/// Nothing here is retried; the caller decides whether to try again.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{url} returned a malformed body: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Blocking client for the coaching-session API.
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// GET one endpoint and decode the JSON body.
    fn get(&self, path: &str) -> Result<Value, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(FetchError::Status { url, status, body });
        }

        resp.json().map_err(|source| FetchError::Decode { url, source })
    }

    /// Fetch all five collections concurrently and join them into one
    /// immutable snapshot before any composition runs.
    ///
    /// A failed decisions request degrades to an empty collection (the
    /// extraction endpoint is optional); any other failure aborts the load
    /// and is reported intact.
    pub fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let (journey, conversations, decisions, profile, metrics) = std::thread::scope(|s| {
            let journey = s.spawn(|| self.get("journey"));
            let conversations = s.spawn(|| self.get("conversations"));
            let decisions = s.spawn(|| self.get("decisions"));
            let profile = s.spawn(|| self.get("member/profile"));
            let metrics = s.spawn(|| self.get("metrics"));
            (
                join(journey),
                join(conversations),
                join(decisions),
                join(profile),
                join(metrics),
            )
        });

        let episodes = ingest::parse_episodes(journey?);
        let conversations = ingest::parse_conversations(conversations?);
        let decisions = match decisions {
            Ok(value) => ingest::parse_decisions(value),
            Err(e) => {
                warn!("Decisions endpoint unavailable, continuing without: {e}");
                Vec::new()
            }
        };
        let profile = Some(ingest::unwrap_envelope(profile?, "member"));
        let metrics = Some(ingest::unwrap_envelope(metrics?, "metrics"));

        info!(
            "Fetched snapshot from {}: {} episodes, {} conversations, {} decisions",
            self.base_url,
            episodes.len(),
            conversations.len(),
            decisions.len()
        );

        Ok(Snapshot {
            episodes,
            conversations,
            decisions,
            profile,
            metrics,
        })
    }
}

fn join<T>(handle: std::thread::ScopedJoinHandle<'_, T>) -> T {
    handle.join().expect("fetch thread panicked")
}
