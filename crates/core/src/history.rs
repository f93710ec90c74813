use crate::ScoreEntry;
use std::collections::HashMap;
use thiserror::Error;

pub const HISTORY_DISPLAY: usize = 50;
const MAX_USER_ID_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid user id {0:?}")]
    InvalidUser(String),
    #[error("history io: {0}")]
    Io(#[from] std::io::Error),
    #[error("history encoding: {0}")]
    Json(#[from] serde_json::Error),
}

/// Private per-user score history kept outside the device leaderboard.
pub trait ScoreHistory {
    fn push(&mut self, user: &str, entry: ScoreEntry) -> Result<(), HistoryError>;
    fn top(&self, user: &str, limit: usize) -> Result<Vec<ScoreEntry>, HistoryError>;
}

/// User ids end up in file names, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_user(user: &str) -> Result<(), HistoryError> {
    let valid = !user.is_empty()
        && user.len() <= MAX_USER_ID_LEN
        && user
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(HistoryError::InvalidUser(user.to_string()))
    }
}

pub fn best_first(mut entries: Vec<ScoreEntry>, limit: usize) -> Vec<ScoreEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(limit);
    entries
}

#[derive(Debug, Default)]
pub struct MemoryScoreHistory {
    users: HashMap<String, Vec<ScoreEntry>>,
}

impl MemoryScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreHistory for MemoryScoreHistory {
    fn push(&mut self, user: &str, entry: ScoreEntry) -> Result<(), HistoryError> {
        validate_user(user)?;
        self.users.entry(user.to_string()).or_default().push(entry);
        Ok(())
    }

    fn top(&self, user: &str, limit: usize) -> Result<Vec<ScoreEntry>, HistoryError> {
        validate_user(user)?;
        let entries = self.users.get(user).cloned().unwrap_or_default();
        Ok(best_first(entries, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_ids_are_restricted() {
        assert!(validate_user("alice_01").is_ok());
        assert!(validate_user("bob-2").is_ok());
        assert!(validate_user("").is_err());
        assert!(validate_user("../etc").is_err());
        assert!(validate_user("a b").is_err());
        assert!(validate_user(&"x".repeat(65)).is_err());
    }

    #[test]
    fn memory_history_is_per_user_and_sorted() {
        let mut history = MemoryScoreHistory::new();
        history
            .push("alice", ScoreEntry::new("alice", 10, 5, 1))
            .expect("push");
        history
            .push("alice", ScoreEntry::new("alice", 40, 3, 2))
            .expect("push");
        history
            .push("bob", ScoreEntry::new("bob", 99, 5, 3))
            .expect("push");
        let alice = history.top("alice", HISTORY_DISPLAY).expect("top");
        assert_eq!(
            alice.iter().map(|e| e.score).collect::<Vec<_>>(),
            vec![40, 10]
        );
        assert_eq!(history.top("alice", 1).expect("top").len(), 1);
        assert!(history.top("carol", 10).expect("top").is_empty());
    }

    #[test]
    fn memory_history_rejects_bad_user() {
        let mut history = MemoryScoreHistory::new();
        let err = history
            .push("no/slash", ScoreEntry::new("x", 1, 3, 0))
            .expect_err("invalid user must fail");
        assert!(matches!(err, HistoryError::InvalidUser(_)));
    }
}
