use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::model::{Conversation, Decision, Episode, Snapshot};

/// Collection file names inside a snapshot directory.
pub const JOURNEY_FILE: &str = "journey.json";
pub const CONVERSATIONS_FILE: &str = "conversations.json";
pub const DECISIONS_FILE: &str = "decisions.json";
pub const MEMBER_FILE: &str = "member.json";
pub const METRICS_FILE: &str = "metrics.json";

/// Unwrap a single-key envelope (`{"journey": [...]}`) or pass a bare
/// document through unchanged. Both shapes exist in the wild.
pub fn unwrap_envelope(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode an array document element by element, skipping records that do
/// not match the expected shape instead of failing the whole collection.
fn decode_elements<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Vec<T> {
    let Value::Array(items) = value else {
        if !value.is_null() {
            warn!("Expected an array of {what}, got something else; treating as empty");
        }
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<T>(item) {
            Ok(record) => out.push(record),
            Err(e) => warn!("Skipping malformed {what} record: {e}"),
        }
    }
    out
}

/// Parse the journey document into episodes.
pub fn parse_episodes(value: Value) -> Vec<Episode> {
    decode_elements(unwrap_envelope(value, "journey"), "episode")
}

/// Parse the conversations document into one flat message list.
///
/// The endpoint serves either a flat array of messages or an array of
/// per-episode objects each carrying a nested `conversations` field. The
/// shape is resolved here, once, by checking the first element; downstream
/// components only ever see the flat form. Records without an id get a
/// positional `conv_<n>` id so decisions can reference them.
pub fn parse_conversations(value: Value) -> Vec<Conversation> {
    let value = unwrap_envelope(value, "conversations");

    let nested = value
        .as_array()
        .and_then(|items| items.first())
        .map(|first| first.get("conversations").is_some())
        .unwrap_or(false);

    let mut conversations = if nested {
        let episodes: Vec<Episode> = decode_elements(value, "episode");
        episodes.into_iter().flat_map(|ep| ep.conversations).collect()
    } else {
        decode_elements(value, "conversation")
    };

    for (i, conv) in conversations.iter_mut().enumerate() {
        if conv.id.is_empty() {
            conv.id = format!("conv_{}", i + 1);
        }
    }
    conversations
}

/// Parse the decisions document. An absent or empty document is an empty
/// collection, never an error. Records without an id get the first 20
/// characters of their statement.
pub fn parse_decisions(value: Value) -> Vec<Decision> {
    let mut decisions: Vec<Decision> =
        decode_elements(unwrap_envelope(value, "decisions"), "decision");
    for d in &mut decisions {
        if d.id.is_empty() {
            d.id = d
                .decision
                .as_deref()
                .or(d.title.as_deref())
                .unwrap_or("unknown")
                .chars()
                .take(20)
                .collect();
        }
    }
    decisions
}

/// Read one JSON document from `dir`, or None when the file is absent.
/// A present-but-unreadable or syntactically invalid file is a real error.
fn read_document(dir: &Path, name: &str) -> Result<Option<Value>> {
    let path = dir.join(name);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in: {}", path.display()))?;
    Ok(Some(value))
}

/// Load a full snapshot from a directory of collection files. Missing
/// files degrade to empty collections; only unreadable or invalid files
/// escalate.
pub fn load_dir(dir: &Path) -> Result<Snapshot> {
    let episodes = read_document(dir, JOURNEY_FILE)?
        .map(parse_episodes)
        .unwrap_or_default();
    let conversations = read_document(dir, CONVERSATIONS_FILE)?
        .map(parse_conversations)
        .unwrap_or_default();
    let decisions = read_document(dir, DECISIONS_FILE)?
        .map(parse_decisions)
        .unwrap_or_default();
    let profile = read_document(dir, MEMBER_FILE)?.map(|v| unwrap_envelope(v, "member"));
    let metrics = read_document(dir, METRICS_FILE)?.map(|v| unwrap_envelope(v, "metrics"));

    info!(
        "Loaded snapshot from {}: {} episodes, {} conversations, {} decisions",
        dir.display(),
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
