pub mod date;

use serde::Serialize;

use crate::model::{Decision, Episode};
use date::DateKey;

/// One row of the merged chronological view: an episode (keeping its
/// original collection index for stable "episode N" labels) or a decision.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TimelineEntry<'a> {
    Episode {
        index: usize,
        episode: &'a Episode,
        #[serde(skip)]
        key: DateKey,
    },
    Decision {
        decision: &'a Decision,
        #[serde(skip)]
        key: DateKey,
    },
}

impl TimelineEntry<'_> {
    pub fn key(&self) -> DateKey {
        match self {
            TimelineEntry::Episode { key, .. } => *key,
            TimelineEntry::Decision { key, .. } => *key,
        }
    }
}

/// Merge episodes and decisions into one ascending chronological sequence.
///
/// Exactly one entry per input record, never more, never fewer. Episodes
/// are keyed on `date_range.start`, decisions on `timestamp`/`date`. The
/// sort is stable with episodes pushed first, so equal keys keep episodes
/// before decisions and each kind in its input order. A date that fails to
/// parse degrades that one entry to the end of the sequence; it never
/// aborts composition.
pub fn compose<'a>(episodes: &'a [Episode], decisions: &'a [Decision]) -> Vec<TimelineEntry<'a>> {
    let mut entries: Vec<TimelineEntry<'a>> =
        Vec::with_capacity(episodes.len() + decisions.len());

    for (index, episode) in episodes.iter().enumerate() {
        entries.push(TimelineEntry::Episode {
            index,
            episode,
            key: date::normalize(episode.start_raw()),
        });
    }
    for decision in decisions {
        entries.push(TimelineEntry::Decision {
            decision,
            key: date::normalize(decision.date_raw()),
        });
    }

    entries.sort_by_key(|e| e.key());
    entries
}

/// Pure-episode ordering mode: episodes alone, sorted by parsed start date
/// through the same normalizer as [`compose`], undated episodes last.
/// Returned pairs carry the original collection index.
pub fn sorted_episodes(episodes: &[Episode]) -> Vec<(usize, &Episode)> {
    let mut sorted: Vec<(usize, &Episode)> = episodes.iter().enumerate().collect();
    sorted.sort_by_key(|(_, ep)| date::normalize(ep.start_raw()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DateRange;

    fn episode(id: &str, start: Option<&str>) -> Episode {
        Episode {
            id: id.to_string(),
            title: format!("Episode {id}"),
            date_range: Some(DateRange {
                start: start.map(String::from),
                end: None,
            }),
            ..Default::default()
        }
    }

    fn decision(id: &str, timestamp: Option<&str>) -> Decision {
        Decision {
            id: id.to_string(),
            decision: Some(format!("Decision {id}")),
            timestamp: timestamp.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn output_length_is_episodes_plus_decisions() {
        let episodes = vec![
            episode("e1", Some("2026-02-01")),
            episode("e2", None),
            episode("e3", Some("not a date")),
        ];
        let decisions = vec![
            decision("d1", Some("2026-01-15")),
            decision("d2", None),
        ];
        let entries = compose(&episodes, &decisions);
        assert_eq!(entries.len(), episodes.len() + decisions.len());
    }

    #[test]
    fn ascending_by_date_with_undated_last() {
        let episodes = vec![
            episode("late", Some("2026-03-01")),
            episode("early", Some("2026-01-01")),
            episode("undated", None),
        ];
        let decisions = vec![decision("mid", Some("2026-02-01"))];
        let entries = compose(&episodes, &decisions);

        let ids: Vec<&str> = entries
            .iter()
            .map(|e| match e {
                TimelineEntry::Episode { episode, .. } => episode.id.as_str(),
                TimelineEntry::Decision { decision, .. } => decision.id.as_str(),
            })
            .collect();
        assert_eq!(ids, vec!["early", "mid", "late", "undated"]);
    }

    #[test]
    fn equal_keys_keep_episodes_before_decisions_in_input_order() {
        let episodes = vec![
            episode("e1", Some("2026-02-01")),
            episode("e2", Some("2026-02-01")),
        ];
        let decisions = vec![
            decision("d1", Some("2026-02-01")),
            decision("d2", Some("2026-02-01")),
        ];
        let entries = compose(&episodes, &decisions);
        let ids: Vec<&str> = entries
            .iter()
            .map(|e| match e {
                TimelineEntry::Episode { episode, .. } => episode.id.as_str(),
                TimelineEntry::Decision { decision, .. } => decision.id.as_str(),
            })
            .collect();
        assert_eq!(ids, vec!["e1", "e2", "d1", "d2"]);
    }

    #[test]
    fn episode_entries_keep_original_index() {
        let episodes = vec![
            episode("second", Some("2026-02-01")),
            episode("first", Some("2026-01-01")),
        ];
        let entries = compose(&episodes, &[]);
        match &entries[0] {
            TimelineEntry::Episode { index, episode, .. } => {
                assert_eq!(episode.id, "first");
                assert_eq!(*index, 1);
            }
            other => panic!("expected episode entry, got {other:?}"),
        }
    }

    #[test]
    fn pure_episode_mode_puts_missing_start_last() {
        let episodes = vec![
            episode("undated", None),
            episode("b", Some("2026-02-01")),
            episode("a", Some("2026-01-01")),
        ];
        let sorted = sorted_episodes(&episodes);
        let ids: Vec<&str> = sorted.iter().map(|(_, ep)| ep.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "undated"]);
    }

    #[test]
    fn both_modes_agree_on_relative_episode_order() {
        let episodes = vec![
            episode("c", Some("2026-03-01")),
            episode("a", Some("2026-01-01")),
            episode("b", Some("2026-02-01")),
        ];
        let merged: Vec<&str> = compose(&episodes, &[])
            .iter()
            .map(|e| match e {
                TimelineEntry::Episode { episode, .. } => episode.id.as_str(),
                TimelineEntry::Decision { .. } => unreachable!(),
            })
            .collect();
        let pure: Vec<&str> = sorted_episodes(&episodes)
            .iter()
            .map(|(_, ep)| ep.id.as_str())
            .collect();
        assert_eq!(merged, pure);
    }
}
