use std::collections::HashSet;

use crate::model::{Conversation, Decision};

/// Display safeguard: search views never return more than this many rows.
pub const MAX_RESULTS: usize = 100;

/// Role labels that mark a message as member-authored rather than
/// team-authored. Compared case-insensitively.
const MEMBER_ROLES: [&str; 3] = ["member", "user", "patient"];

/// Categorical filter applied before the free-text query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    All,
    /// Only conversations some decision points back to.
    Decisions,
    /// Only conversations whose role is not a member-role label.
    Team,
}

impl FilterType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(FilterType::All),
            "decisions" => Some(FilterType::Decisions),
            "team" => Some(FilterType::Team),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::All => "all",
            FilterType::Decisions => "decisions",
            FilterType::Team => "team",
        }
    }
}

/// Filter and search the conversation collection.
///
/// The categorical filter runs first, then the case-insensitive substring
/// query over sender/role/topic/message (missing fields match as empty
/// strings), then the [`MAX_RESULTS`] cap. Relative input order is
/// preserved throughout, so the result is always a stable prefix of the
/// filtered sequence.
pub fn filter_conversations<'a>(
    conversations: &'a [Conversation],
    decisions: &[Decision],
    filter: FilterType,
    query: Option<&str>,
) -> Vec<&'a Conversation> {
    let mut filtered: Vec<&Conversation> = match filter {
        FilterType::All => conversations.iter().collect(),
        FilterType::Decisions => {
            let referenced: HashSet<&str> = decisions
                .iter()
                .filter_map(|d| d.conversation_ref())
                .collect();
            conversations
                .iter()
                .filter(|c| referenced.contains(c.id.as_str()))
                .collect()
        }
        FilterType::Team => conversations
            .iter()
            .filter(|c| {
                c.role
                    .as_deref()
                    .is_some_and(|r| !MEMBER_ROLES.contains(&r.to_lowercase().as_str()))
            })
            .collect(),
    };

    if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
        let needle = query.to_lowercase();
        filtered.retain(|c| {
            c.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });
    }

    filtered.truncate(MAX_RESULTS);
    filtered
}
