use reelcade_core::{best_first, validate_user, HistoryError, ScoreEntry, ScoreHistory};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-user score history stored as one JSON array per user.
#[derive(Debug, Clone)]
pub struct FileScoreHistory {
    dir: PathBuf,
}

impl FileScoreHistory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn user_path(&self, user: &str) -> Result<PathBuf, HistoryError> {
        validate_user(user)?;
        Ok(self.dir.join(format!("{user}.json")))
    }

    fn read_entries(path: &Path) -> Result<Vec<ScoreEntry>, HistoryError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let body = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ScoreHistory for FileScoreHistory {
    fn push(&mut self, user: &str, entry: ScoreEntry) -> Result<(), HistoryError> {
        let path = self.user_path(user)?;
        let mut entries = Self::read_entries(&path)?;
        entries.push(entry);
        fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_string_pretty(&entries)?;
        fs::write(&path, body)?;
        log::debug!("score history for {user}: {} entries", entries.len());
        Ok(())
    }

    fn top(&self, user: &str, limit: usize) -> Result<Vec<ScoreEntry>, HistoryError> {
        let path = self.user_path(user)?;
        Ok(best_first(Self::read_entries(&path)?, limit))
    }
}
