//! Poll tallies: per-event vote counts keyed by option name.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::EventId;
use crate::error::MatchdayError;

/// One stored `(event, option)` vote counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    /// Owning event.
    pub event_id: EventId,
    /// Option label, usually a team name.
    pub option_name: String,
    /// Votes received so far.
    pub votes: u64,
    /// Last time the counter changed.
    pub updated_at: DateTime<Utc>,
}

/// Snapshot of an event's poll, ordered by option name ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollTally {
    options: BTreeMap<String, u64>,
}

impl PollTally {
    /// Sum of all option votes.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.options.values().copied().fold(0, u64::saturating_add)
    }

    /// Votes for `option`, if the option exists.
    #[must_use]
    pub fn votes(&self, option: &str) -> Option<u64> {
        self.options.get(option).copied()
    }

    /// Display share of `votes` in this tally; see [`vote_share`].
    #[must_use]
    pub fn share(&self, votes: u64) -> f64 {
        vote_share(votes, self.total())
    }

    /// Options in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.options.iter().map(|(name, votes)| (name.as_str(), *votes))
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` when no option rows exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Borrows the underlying ordered map.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.options
    }
}

impl FromIterator<PollOption> for PollTally {
    fn from_iter<I: IntoIterator<Item = PollOption>>(iter: I) -> Self {
        Self {
            options: iter
                .into_iter()
                .map(|row| (row.option_name, row.votes))
                .collect(),
        }
    }
}

/// Percentage of `total` held by `votes`, rounded to one decimal.
///
/// Zero when nobody has voted.
#[must_use]
pub fn vote_share(votes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let pct = votes as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Trims a submitted option name.
///
/// # Errors
///
/// Returns [`MatchdayError::InvalidInput`] if nothing is left after trimming.
pub fn normalize_option_name(raw: &str) -> Result<String, MatchdayError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(MatchdayError::InvalidInput(
            "option name required".to_string(),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(event_id: EventId, name: &str, votes: u64) -> PollOption {
        PollOption {
            event_id,
            option_name: name.to_string(),
            votes,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tally_orders_by_name() {
        let id = EventId::new();
        let tally: PollTally = vec![row(id, "Red", 3), row(id, "Blue", 1), row(id, "Green", 0)]
            .into_iter()
            .collect();
        let names: Vec<&str> = tally.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Blue", "Green", "Red"]);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.votes("Red"), Some(3));
    }

    #[test]
    fn share_rounds_to_one_decimal() {
        assert!((vote_share(1, 3) - 33.3).abs() < f64::EPSILON);
        assert!((vote_share(2, 3) - 66.7).abs() < f64::EPSILON);
        assert!((vote_share(5, 5) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn share_is_zero_without_votes() {
        assert!(vote_share(0, 0).abs() < f64::EPSILON);
        assert!(PollTally::default().share(0).abs() < f64::EPSILON);
    }

    #[test]
    fn blank_option_name_is_rejected() {
        assert!(normalize_option_name("  \t").is_err());
        assert_eq!(normalize_option_name(" Red ").ok().as_deref(), Some("Red"));
    }
}
