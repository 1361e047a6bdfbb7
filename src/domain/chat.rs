//! Chat messages and the rules that bound them.
//!
//! Usernames are trimmed and must keep at least [`MIN_USERNAME_CHARS`];
//! anything beyond [`MAX_USERNAME_CHARS`] is cut off rather than rejected.
//! Messages are trimmed and must be between 1 and [`MAX_MESSAGE_CHARS`]
//! characters. Lengths count `char`s, not bytes.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::EventId;
use crate::error::MatchdayError;

/// Shortest accepted username.
pub const MIN_USERNAME_CHARS: usize = 2;
/// Usernames are truncated to this many characters.
pub const MAX_USERNAME_CHARS: usize = 20;
/// Longest accepted message.
pub const MAX_MESSAGE_CHARS: usize = 200;

/// A stored chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Store-assigned sequence number; breaks `created_at` ties.
    pub id: i64,
    /// Owning event.
    pub event_id: EventId,
    /// Display name, already normalized.
    pub username: String,
    /// Message body, already normalized.
    pub message: String,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

/// A chat line about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    /// Owning event.
    pub event_id: EventId,
    /// Display name.
    pub username: String,
    /// Message body.
    pub message: String,
    /// Creation time to store.
    pub created_at: DateTime<Utc>,
}

/// How much chat history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Messages older than this are dropped on the next read.
    pub max_age: Duration,
    /// Messages kept per event after each write.
    pub max_messages: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(60 * 60),
            max_messages: 100,
        }
    }
}

impl RetentionPolicy {
    /// Oldest creation time that survives the age prune at `now`.
    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let age = chrono::Duration::from_std(self.max_age).unwrap_or(chrono::Duration::MAX);
        now.checked_sub_signed(age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Trims and bounds a username.
///
/// # Errors
///
/// Returns [`MatchdayError::InvalidInput`] if fewer than
/// [`MIN_USERNAME_CHARS`] remain after trimming.
pub fn normalize_username(raw: &str) -> Result<String, MatchdayError> {
    let name = raw.trim();
    if name.chars().count() < MIN_USERNAME_CHARS {
        return Err(MatchdayError::InvalidInput(format!(
            "username must be at least {MIN_USERNAME_CHARS} characters"
        )));
    }
    Ok(name.chars().take(MAX_USERNAME_CHARS).collect())
}

/// Trims and bounds a message body.
///
/// # Errors
///
/// Returns [`MatchdayError::InvalidInput`] if the message is empty after
/// trimming or longer than [`MAX_MESSAGE_CHARS`].
pub fn normalize_message(raw: &str) -> Result<String, MatchdayError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(MatchdayError::InvalidInput(
            "message cannot be empty".to_string(),
        ));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(MatchdayError::InvalidInput(format!(
            "message too long (max {MAX_MESSAGE_CHARS} characters)"
        )));
    }
    Ok(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_bounds() {
        assert!(normalize_username("a").is_err());
        assert!(normalize_username("  a  ").is_err());
        assert_eq!(normalize_username("ab").ok().as_deref(), Some("ab"));

        let long = "u".repeat(25);
        let Ok(name) = normalize_username(&long) else {
            unreachable!("long usernames are truncated, not rejected");
        };
        assert_eq!(name.chars().count(), MAX_USERNAME_CHARS);
    }

    #[test]
    fn username_counts_chars_not_bytes() {
        let name = "é".repeat(21);
        assert_eq!(
            normalize_username(&name).ok().map(|n| n.chars().count()),
            Some(20)
        );
    }

    #[test]
    fn message_bounds() {
        assert!(normalize_message("   ").is_err());
        assert!(normalize_message(&"m".repeat(200)).is_ok());
        assert!(normalize_message(&"m".repeat(201)).is_err());
        assert_eq!(normalize_message(" gol! ").ok().as_deref(), Some("gol!"));
    }

    #[test]
    fn cutoff_is_one_hour_back_by_default() {
        let now = Utc::now();
        let cutoff = RetentionPolicy::default().cutoff(now);
        assert_eq!(now - cutoff, chrono::Duration::hours(1));
    }
}
