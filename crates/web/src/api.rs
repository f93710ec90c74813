use reelcade_core::{
    Event, EventBus, Leaderboard, Machine, ScoreEntry, ScoreHistory, SpinOutcome,
    HISTORY_DISPLAY, LEADERBOARD_DISPLAY,
};
use reelcade_data::{
    load_assets, load_state_file, now_millis, save_state_file, FileScoreHistory,
    SavedMachineState,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const TOP_UP: i64 = 100;

pub struct AppState {
    pub machine: Machine,
    pub leaderboard: Leaderboard,
    pub events: EventBus,
    pub history: FileScoreHistory,
    pub state_path: Option<PathBuf>,
    pub reels: Vec<String>,
}

impl AppState {
    pub fn new(
        assets_dir: &Path,
        seed: u64,
        state_path: Option<PathBuf>,
        scores_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let assets = load_assets(assets_dir)?;
        let mut machine = Machine::new(assets.table, assets.config, seed)?;
        let mut leaderboard = Leaderboard::new();
        if let Some(path) = state_path.as_deref().filter(|path| path.exists()) {
            match load_state_file(path) {
                Ok(saved) => leaderboard = saved.restore(&mut machine),
                Err(err) => log::warn!("ignoring save file: {err:#}"),
            }
        }
        let reels = machine.preview_reels();
        Ok(Self {
            machine,
            leaderboard,
            events: EventBus::default(),
            history: FileScoreHistory::new(scores_dir),
            state_path,
            reels,
        })
    }

    pub fn persist(&self) {
        let Some(path) = self.state_path.as_deref() else {
            return;
        };
        let state = SavedMachineState::capture(&self.machine, &self.leaderboard);
        if let Err(err) = save_state_file(&state, path) {
            log::warn!("save failed: {err:#}");
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Default)]
pub struct ActionOutput {
    pub spin: Option<SpinOutcome>,
    pub scores: Option<Vec<ScoreEntry>>,
}

#[derive(Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    pub error: Option<String>,
    pub state: UiState,
    pub events: Vec<Event>,
    pub spin: Option<SpinOutcome>,
    pub scores: Option<Vec<ScoreEntry>>,
}

#[derive(Serialize)]
pub struct UiState {
    pub balance: i64,
    pub bet: i64,
    pub reel_count: u32,
    pub base_jackpot: f64,
    pub jackpot: i64,
    pub rules: String,
    pub player_name: String,
    pub reels: Vec<String>,
    pub leaderboard: Vec<ScoreEntry>,
    pub symbols: Vec<UiSymbol>,
}

#[derive(Serialize)]
pub struct UiSymbol {
    pub icon: String,
    pub weight: u32,
    pub pay: Vec<(u32, f64)>,
}

/// Parses, applies and persists one `/api/action` body. Malformed bodies are
/// reported like rejected actions.
pub fn handle_action_body(state: &mut AppState, body: &str) -> ApiResponse {
    let result = match serde_json::from_str::<ActionRequest>(body) {
        Ok(action) => {
            log::debug!("action {:?} value {:?}", action.action, action.value);
            let result = apply_action(state, action);
            state.persist();
            result
        }
        Err(err) => Err(format!("invalid request body: {err}")),
    };
    if let Err(err) = &result {
        log::info!("action rejected: {err}");
    }
    build_response(state, result)
}

pub fn build_response(state: &mut AppState, result: Result<ActionOutput, String>) -> ApiResponse {
    let events: Vec<_> = state.events.drain().collect();
    let (error, output) = match result {
        Ok(output) => (None, output),
        Err(err) => (Some(err), ActionOutput::default()),
    };
    ApiResponse {
        ok: error.is_none(),
        error,
        state: snapshot_state(state),
        events,
        spin: output.spin,
        scores: output.scores,
    }
}

fn snapshot_state(state: &AppState) -> UiState {
    let machine = &state.machine;
    UiState {
        balance: machine.balance,
        bet: machine.config.bet,
        reel_count: machine.config.reel_count,
        base_jackpot: machine.config.base_jackpot,
        jackpot: machine.current_jackpot(),
        rules: machine.rules_text(),
        player_name: machine.player_name.clone(),
        reels: state.reels.clone(),
        leaderboard: state.leaderboard.top(LEADERBOARD_DISPLAY).to_vec(),
        symbols: machine
            .table
            .symbols()
            .iter()
            .map(|symbol| UiSymbol {
                icon: symbol.id.clone(),
                weight: symbol.weight,
                pay: symbol.pay.entries().collect(),
            })
            .collect(),
    }
}

pub fn apply_action(state: &mut AppState, req: ActionRequest) -> Result<ActionOutput, String> {
    let machine = &mut state.machine;
    let events = &mut state.events;
    let mut output = ActionOutput::default();
    match req.action.as_str() {
        "spin" => {
            let outcome = machine.spin(events).map_err(|err| err.to_string())?;
            state.reels = outcome.draw.clone();
            output.spin = Some(outcome);
        }
        "reels" => {
            machine.set_reel_count(parse_value(req.value)?, events);
            state.reels = machine.preview_reels();
        }
        "bet" => {
            machine.set_bet(parse_value(req.value)?, events);
        }
        "jackpot" => {
            machine
                .set_base_jackpot(parse_value(req.value)?, events)
                .map_err(|err| err.to_string())?;
        }
        "add" => {
            machine.credit(TOP_UP, events).map_err(|err| err.to_string())?;
        }
        "reset" => machine.reset_balance(events),
        "name" => {
            machine.player_name = req.value.unwrap_or_default().trim().to_string();
        }
        "save_score" => {
            let entry = machine.score_entry(now_millis());
            let name = entry.name.clone();
            let score = entry.score;
            let rank = state.leaderboard.record(entry);
            events.push(Event::ScoreSaved { name, score, rank });
        }
        "clear_board" => {
            state.leaderboard.clear();
            events.push(Event::LeaderboardCleared);
        }
        "push_score" => {
            let user = required_user(req.value)?;
            let entry = machine.score_entry(now_millis());
            state
                .history
                .push(&user, entry)
                .map_err(|err| err.to_string())?;
        }
        "pull_scores" => {
            let user = required_user(req.value)?;
            let scores = state
                .history
                .top(&user, HISTORY_DISPLAY)
                .map_err(|err| err.to_string())?;
            output.scores = Some(scores);
        }
        _ => return Err("unknown action".to_string()),
    }
    Ok(output)
}

fn parse_value<T: std::str::FromStr>(value: Option<String>) -> Result<T, String> {
    let raw = value.ok_or_else(|| "missing value".to_string())?;
    raw.trim()
        .parse::<T>()
        .map_err(|_| format!("invalid value {raw:?}"))
}

fn required_user(value: Option<String>) -> Result<String, String> {
    match value {
        Some(user) if !user.trim().is_empty() => Ok(user.trim().to_string()),
        _ => Err("sign in first".to_string()),
    }
}
