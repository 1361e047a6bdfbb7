//! Poll DTOs: tally snapshots and vote submission.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EventId, PollTally};

/// Request body for `POST /events/{id}/poll/votes`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VoteRequest {
    /// Option to vote for, usually one of the two team names.
    #[serde(alias = "team_name")]
    pub option_name: String,
}

/// One option line of a poll snapshot.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PollOptionDto {
    /// Option label.
    pub option_name: String,
    /// Votes received.
    pub votes: u64,
    /// Share of all votes, in percent with one decimal.
    pub percentage: f64,
}

/// Response body for the poll endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct PollResultsResponse {
    /// Event the poll belongs to.
    pub event_id: EventId,
    /// Sum of all option votes.
    pub total_votes: u64,
    /// Options ordered by name ascending.
    pub options: Vec<PollOptionDto>,
}

impl PollResultsResponse {
    /// Builds the response from a tally snapshot.
    #[must_use]
    pub fn from_tally(event_id: EventId, tally: &PollTally) -> Self {
        Self {
            event_id,
            total_votes: tally.total(),
            options: tally
                .iter()
                .map(|(name, votes)| PollOptionDto {
                    option_name: name.to_string(),
                    votes,
                    percentage: tally.share(votes),
                })
                .collect(),
        }
    }
}
