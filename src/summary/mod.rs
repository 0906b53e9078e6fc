use serde::Serialize;

use crate::model::{Decision, Episode};
use crate::timeline;

/// Headline counters derived from the merged data.
#[derive(Debug, Clone, Serialize)]
pub struct JourneySummary {
    pub total_messages: u64,
    pub total_decisions: u64,
    pub episode_count: usize,
    /// Episodes whose reported metrics show at least one decision.
    pub decision_episode_count: usize,
    pub date_span: DateSpan,
}

/// First start / last end of the chronologically sorted episodes, each
/// independently falling back to "N/A".
#[derive(Debug, Clone, Serialize)]
pub struct DateSpan {
    pub start: String,
    pub end: String,
}

/// Derive summary counters from the snapshot collections.
///
/// `total_decisions` prefers the decision collection when it is non-empty
/// and otherwise sums the per-episode metric, so the headline is never
/// silently zero when only one source is populated.
pub fn summarize(episodes: &[Episode], decisions: &[Decision]) -> JourneySummary {
    let total_messages = episodes.iter().map(Episode::message_count).sum();

    let total_decisions = if decisions.is_empty() {
        episodes.iter().map(Episode::decision_count).sum()
    } else {
        decisions.len() as u64
    };

    let decision_episode_count = episodes
        .iter()
        .filter(|ep| ep.decision_count() > 0)
        .count();

    let sorted = timeline::sorted_episodes(episodes);
    let start = sorted
        .first()
        .map(|(_, ep)| timeline::date::normalize(ep.start_raw()).to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let end = sorted
        .last()
        .map(|(_, ep)| timeline::date::normalize(ep.end_raw()).to_string())
        .unwrap_or_else(|| "N/A".to_string());

    JourneySummary {
        total_messages,
        total_decisions,
        episode_count: episodes.len(),
        decision_episode_count,
        date_span: DateSpan { start, end },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Conversation, DateRange, EpisodeMetrics};

    fn episode_with_metric(total_messages: Option<u64>, decisions: Option<u64>) -> Episode {
        Episode {
            metrics: Some(EpisodeMetrics {
                total_messages,
                decisions,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn message_total_falls_back_to_conversation_count() {
        let with_metric = episode_with_metric(Some(5), None);
        let without_metric = Episode {
            conversations: vec![
                Conversation::default(),
                Conversation::default(),
                Conversation::default(),
            ],
            ..Default::default()
        };
        let summary = summarize(&[with_metric, without_metric], &[]);
        assert_eq!(summary.total_messages, 8);
    }

    #[test]
    fn decision_total_prefers_nonempty_collection() {
        let episodes = vec![episode_with_metric(None, Some(4))];
        let decisions = vec![Decision::default(), Decision::default()];
        assert_eq!(summarize(&episodes, &decisions).total_decisions, 2);
    }

    #[test]
    fn decision_total_falls_back_to_episode_metrics() {
        let episodes = vec![
            episode_with_metric(None, Some(4)),
            episode_with_metric(None, Some(1)),
            episode_with_metric(None, None),
        ];
        let summary = summarize(&episodes, &[]);
        assert_eq!(summary.total_decisions, 5);
        assert_eq!(summary.decision_episode_count, 2);
    }

    #[test]
    fn date_span_follows_chronological_episode_order() {
        let episodes = vec![
            Episode {
                date_range: Some(DateRange {
                    start: Some("2026-03-01".into()),
                    end: Some("2026-03-20 18:00 SGT".into()),
                }),
                ..Default::default()
            },
            Episode {
                date_range: Some(DateRange {
                    start: Some("2026-01-05".into()),
                    end: Some("2026-02-10".into()),
                }),
                ..Default::default()
            },
        ];
        let summary = summarize(&episodes, &[]);
        assert_eq!(summary.date_span.start, "Jan 5, 2026");
        assert_eq!(summary.date_span.end, "Mar 20, 2026");
    }

    #[test]
    fn empty_input_yields_empty_state_not_error() {
        let summary = summarize(&[], &[]);
        assert_eq!(summary.episode_count, 0);
        assert_eq!(summary.total_messages, 0);
        assert_eq!(summary.total_decisions, 0);
        assert_eq!(summary.date_span.start, "N/A");
        assert_eq!(summary.date_span.end, "N/A");
    }

    #[test]
    fn undated_ends_fall_back_independently() {
        let episodes = vec![Episode {
            date_range: Some(DateRange {
                start: Some("2026-01-05".into()),
                end: None,
            }),
            ..Default::default()
        }];
        let summary = summarize(&episodes, &[]);
        assert_eq!(summary.date_span.start, "Jan 5, 2026");
        assert_eq!(summary.date_span.end, "N/A");
    }
}
