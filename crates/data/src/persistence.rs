use crate::schema::{Leaderboard, MachineConfig};
use anyhow::{bail, Context};
use reelcade_core::{clamp_bet, clamp_reel_count, Machine, DEFAULT_BASE_JACKPOT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const SAVE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMachineState {
    pub version: u32,
    pub reel_count: u32,
    pub balance: i64,
    #[serde(default)]
    pub leaderboard: Leaderboard,
    #[serde(default)]
    pub player_name: String,
    pub base_jackpot: f64,
    pub bet: i64,
}

impl SavedMachineState {
    pub fn capture(machine: &Machine, leaderboard: &Leaderboard) -> Self {
        Self {
            version: SAVE_SCHEMA_VERSION,
            reel_count: machine.config.reel_count,
            balance: machine.balance,
            leaderboard: leaderboard.clone(),
            player_name: machine.player_name.clone(),
            base_jackpot: machine.config.base_jackpot,
            bet: machine.config.bet,
        }
    }

    /// Hand-edited saves are pulled back into range instead of rejected.
    pub fn restore(self, machine: &mut Machine) -> Leaderboard {
        let base_jackpot = if self.base_jackpot.is_finite() && self.base_jackpot > 0.0 {
            self.base_jackpot
        } else {
            DEFAULT_BASE_JACKPOT
        };
        machine.config = MachineConfig {
            reel_count: clamp_reel_count(i64::from(self.reel_count)),
            bet: clamp_bet(self.bet),
            base_jackpot,
        };
        machine.balance = self.balance;
        machine.player_name = self.player_name;
        self.leaderboard
    }
}

pub fn default_state_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("REELCADE_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".reelcade_state.json"))
}

pub fn default_history_dir() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("REELCADE_SCORES") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".reelcade_scores"))
}

pub fn save_state_file(state: &SavedMachineState, path: &Path) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(state).context("serialize save state")?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))
}

pub fn load_state_file(path: &Path) -> anyhow::Result<SavedMachineState> {
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let state: SavedMachineState =
        serde_json::from_str(&body).with_context(|| format!("parse {}", path.display()))?;
    if state.version != SAVE_SCHEMA_VERSION {
        bail!(
            "unsupported save version {} (expected {})",
            state.version,
            SAVE_SCHEMA_VERSION
        );
    }
    Ok(state)
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
