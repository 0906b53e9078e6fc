use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::model::{Decision, Snapshot};

/// Cross-reference indices derived from one snapshot. Pure projection:
/// building it has no side effects beyond collision warnings.
#[derive(Debug, Default)]
pub struct CrossRefs<'a> {
    /// Conversation id -> owning episode id, from episode containment.
    /// Duplicate conversation ids across episodes keep the last writer
    /// (episode collection order, then within-episode order).
    pub conversation_to_episode: HashMap<&'a str, &'a str>,
    /// Decision id -> the conversation it resolves to. Decisions whose
    /// reference does not match any known conversation id are unlinked and
    /// simply absent here.
    pub decision_to_conversation: HashMap<&'a str, &'a str>,
    /// Conversation id -> decisions referencing it, in decision collection
    /// order. Keyed on the reference as written, whether or not it resolves.
    pub decisions_by_conversation: HashMap<&'a str, Vec<&'a Decision>>,
}

impl<'a> CrossRefs<'a> {
    /// Decisions behind a given conversation, empty when there are none.
    pub fn decisions_for(&self, conversation_id: &str) -> &[&'a Decision] {
        self.decisions_by_conversation
            .get(conversation_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Episode owning the conversation a decision resolves to, if any.
    pub fn episode_for_decision(&self, decision: &Decision) -> Option<&'a str> {
        let conv_id = self.decision_to_conversation.get(decision.id.as_str())?;
        self.conversation_to_episode.get(conv_id).copied()
    }
}

/// Build all cross-reference indices for a snapshot.
pub fn build(snapshot: &Snapshot) -> CrossRefs<'_> {
    let mut refs = CrossRefs::default();

    for episode in &snapshot.episodes {
        for conv in &episode.conversations {
            if conv.id.is_empty() {
                continue;
            }
            if let Some(previous) = refs
                .conversation_to_episode
                .insert(conv.id.as_str(), episode.id.as_str())
            {
                if previous != episode.id {
                    warn!(
                        "Conversation id {} reused across episodes (was {}, keeping {})",
                        conv.id, previous, episode.id
                    );
                }
            }
        }
    }

    let known_ids: HashSet<&str> = snapshot
        .all_conversations()
        .iter()
        .map(|c| c.id.as_str())
        .collect();

    for decision in &snapshot.decisions {
        let Some(conv_ref) = decision.conversation_ref() else {
            continue;
        };
        refs.decisions_by_conversation
            .entry(conv_ref)
            .or_default()
            .push(decision);
        if known_ids.contains(conv_ref) && !decision.id.is_empty() {
            refs.decision_to_conversation
                .insert(decision.id.as_str(), conv_ref);
        }
    }

    refs
}
