use serde::{Deserialize, Serialize};

/// One contiguous period of member engagement, as served by the journey
/// endpoint. Everything past `id` and `title` is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub metrics: Option<EpisodeMetrics>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    #[serde(default)]
    pub total_messages: Option<u64>,
    #[serde(default)]
    pub decisions: Option<u64>,
    #[serde(default)]
    pub team_messages: Option<u64>,
    #[serde(default)]
    pub member_messages: Option<u64>,
    #[serde(default)]
    pub primary_topics: Vec<String>,
}

impl Episode {
    /// Raw start date string, when the episode carries one.
    pub fn start_raw(&self) -> Option<&str> {
        self.date_range.as_ref().and_then(|r| r.start.as_deref())
    }

    /// Raw end date string, when the episode carries one.
    pub fn end_raw(&self) -> Option<&str> {
        self.date_range.as_ref().and_then(|r| r.end.as_deref())
    }

    /// Message count: reported metric first, contained conversations second.
    pub fn message_count(&self) -> u64 {
        self.metrics
            .as_ref()
            .and_then(|m| m.total_messages)
            .unwrap_or(self.conversations.len() as u64)
    }

    /// Reported decision count for this episode, 0 when unreported.
    pub fn decision_count(&self) -> u64 {
        self.metrics.as_ref().and_then(|m| m.decisions).unwrap_or(0)
    }
}

/// A single message in the coaching relationship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub action_decision: Option<bool>,
    #[serde(default)]
    pub decision_type: Option<String>,
}

impl Conversation {
    /// The four searchable text fields, missing ones as empty strings.
    pub fn search_fields(&self) -> [&str; 4] {
        [
            self.sender.as_deref().unwrap_or(""),
            self.role.as_deref().unwrap_or(""),
            self.topic.as_deref().unwrap_or(""),
            self.message.as_deref().unwrap_or(""),
        ]
    }
}

/// An extracted outcome of the coaching dialogue. The wire format has grown
/// alias pairs over time (`decision`/`title`, `reason`/`rationale`, ...);
/// both spellings are kept and the accessors pick the populated one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub trigger_message: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub trigger_message_id: Option<String>,
    #[serde(default)]
    pub team_member: Option<String>,
    #[serde(default)]
    pub linked_outcomes: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl Decision {
    /// The decision statement for display.
    pub fn statement(&self) -> &str {
        self.decision
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("(no decision text)")
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.reason.as_deref().or(self.rationale.as_deref())
    }

    pub fn trigger_text(&self) -> Option<&str> {
        self.trigger_message.as_deref().or(self.trigger.as_deref())
    }

    /// Foreign key into the conversation collection: `conversation_id`
    /// first, then `trigger_message_id`. None means unlinked.
    pub fn conversation_ref(&self) -> Option<&str> {
        self.conversation_id
            .as_deref()
            .or(self.trigger_message_id.as_deref())
    }

    /// Raw decision date string (`timestamp` preferred over `date`).
    pub fn date_raw(&self) -> Option<&str> {
        self.timestamp.as_deref().or(self.date.as_deref())
    }
}

/// One fully-materialized data load. Immutable once built; every component
/// reads from it and projects, nothing mutates it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub episodes: Vec<Episode>,
    pub conversations: Vec<Conversation>,
    pub decisions: Vec<Decision>,
    /// Member profile document, passed through untouched.
    pub profile: Option<serde_json::Value>,
    /// Metrics summary document, passed through untouched.
    pub metrics: Option<serde_json::Value>,
}

impl Snapshot {
    /// Conversations from the flat collection plus any that only exist
    /// nested inside episodes, in episode order. The flat collection wins
    /// on duplicates (it is the authoritative one for search views).
    pub fn all_conversations(&self) -> Vec<&Conversation> {
        let mut seen: std::collections::HashSet<&str> =
            self.conversations.iter().map(|c| c.id.as_str()).collect();
        let mut all: Vec<&Conversation> = self.conversations.iter().collect();
        for ep in &self.episodes {
            for conv in &ep.conversations {
                if seen.insert(conv.id.as_str()) {
                    all.push(conv);
                }
            }
        }
        all
    }
}
