use serde::{Deserialize, Serialize};

pub const LEADERBOARD_CAPACITY: usize = 200;
pub const LEADERBOARD_DISPLAY: usize = 50;
pub const ANONYMOUS_PLAYER: &str = "Anon";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
    pub reels: u32,
    /// Unix time in milliseconds.
    pub at: u64,
}

impl ScoreEntry {
    pub fn new(name: &str, score: i64, reels: u32, at: u64) -> Self {
        Self {
            name: display_name(name),
            score,
            reels,
            at,
        }
    }
}

pub fn display_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        ANONYMOUS_PLAYER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Device-local high scores, best first, capped at [`LEADERBOARD_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ScoreEntry>", into = "Vec<ScoreEntry>")]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the 0-based rank, or `None` when the entry did not make the cut.
    /// Equal scores keep their insertion order.
    pub fn record(&mut self, mut entry: ScoreEntry) -> Option<usize> {
        entry.name = display_name(&entry.name);
        let rank = self
            .entries
            .partition_point(|existing| existing.score >= entry.score);
        self.entries.insert(rank, entry);
        self.entries.truncate(LEADERBOARD_CAPACITY);
        (rank < LEADERBOARD_CAPACITY).then_some(rank)
    }

    pub fn top(&self, limit: usize) -> &[ScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ScoreEntry>> for Leaderboard {
    fn from(mut entries: Vec<ScoreEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_CAPACITY);
        Self { entries }
    }
}

impl From<Leaderboard> for Vec<ScoreEntry> {
    fn from(value: Leaderboard) -> Self {
        value.entries
    }
}
