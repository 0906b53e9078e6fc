use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Comparable ordering key for every date in the snapshot.
///
/// `Day` before `Undated` in the derived order, so anything unparseable
/// sorts after every real date in every view. Normalization is total: any
/// input, including garbage, maps to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateKey {
    Day(NaiveDate),
    Undated,
}

fn date_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})").expect("valid regex"))
}

/// Normalize a raw date string into a [`DateKey`].
///
/// Source dates come in several shapes: plain ISO dates, datetimes with a
/// trailing timezone abbreviation ("2026-01-02 07:05 SGT"), RFC 3339, or
/// free text. A leading `YYYY-MM-DD` wins and any trailing time/zone token
/// is ignored; a few generic formats are tried next; everything else is
/// `Undated`.
pub fn normalize(raw: Option<&str>) -> DateKey {
    let Some(raw) = raw else {
        return DateKey::Undated;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return DateKey::Undated;
    }

    if let Some(cap) = date_prefix_re().captures(raw) {
        if let Ok(d) = NaiveDate::parse_from_str(&cap[1], "%Y-%m-%d") {
            return DateKey::Day(d);
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return DateKey::Day(dt.date_naive());
    }
    for fmt in ["%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y", "%B %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return DateKey::Day(d);
        }
    }

    DateKey::Undated
}

impl DateKey {
    pub fn is_dated(&self) -> bool {
        matches!(self, DateKey::Day(_))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // en-US short form, "Jan 2, 2026".
            DateKey::Day(d) => write!(f, "{}", d.format("%b %-d, %Y")),
            DateKey::Undated => write!(f, "N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_parses() {
        assert_eq!(
            normalize(Some("2026-02-01")),
            DateKey::Day(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
        );
    }

    #[test]
    fn timezone_suffix_is_ignored() {
        assert_eq!(
            normalize(Some("2026-01-02 07:05 SGT")),
            normalize(Some("2026-01-02"))
        );
    }

    #[test]
    fn rfc3339_parses() {
        assert_eq!(
            normalize(Some("2026-03-15T09:30:00+08:00")),
            DateKey::Day(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap())
        );
    }

    #[test]
    fn missing_and_garbage_are_undated() {
        assert_eq!(normalize(None), DateKey::Undated);
        assert_eq!(normalize(Some("")), DateKey::Undated);
        assert_eq!(normalize(Some("   ")), DateKey::Undated);
        assert_eq!(normalize(Some("sometime next week")), DateKey::Undated);
        // Prefix shape without a real calendar date behind it.
        assert_eq!(normalize(Some("2026-99-99")), DateKey::Undated);
    }

    #[test]
    fn undated_sorts_after_every_real_date() {
        let real = normalize(Some("9999-12-31"));
        assert!(real < DateKey::Undated);
    }

    #[test]
    fn normalizing_display_output_is_stable() {
        // Round-tripping a dated key through its display form keeps the day.
        let key = normalize(Some("2026-02-01"));
        let redisplayed = normalize(Some(&key.to_string()));
        assert_eq!(key, redisplayed);
        assert_eq!(normalize(Some("N/A")), DateKey::Undated);
    }

    #[test]
    fn display_formats() {
        assert_eq!(normalize(Some("2026-02-01")).to_string(), "Feb 1, 2026");
        assert_eq!(DateKey::Undated.to_string(), "N/A");
    }
}
