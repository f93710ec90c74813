use crate::command::{Command, HELP};
use anyhow::{anyhow, Context};
use reelcade_core::{
    Event, EventBus, Leaderboard, Machine, MachineError, RngState, ScoreHistory,
    SpinOutcome, HISTORY_DISPLAY, LEADERBOARD_DISPLAY,
};
use reelcade_data::{
    default_history_dir, default_state_path, load_assets, load_state_file, now_millis,
    save_state_file, Assets, FileScoreHistory, SavedMachineState,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

const SPIN_FRAMES: usize = 14;
const FRAME_DELAY: Duration = Duration::from_millis(80);
const TOP_UP: i64 = 100;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub assets: PathBuf,
    pub seed: Option<u64>,
    pub state_path: Option<PathBuf>,
    pub scores_dir: Option<PathBuf>,
    pub animate: bool,
}

pub struct Session {
    machine: Machine,
    leaderboard: Leaderboard,
    events: EventBus,
    state_path: Option<PathBuf>,
    history: Option<FileScoreHistory>,
    animate: bool,
}

pub fn open_assets(options: &SessionOptions) -> anyhow::Result<(Assets, u64)> {
    let assets = load_assets(&options.assets)
        .with_context(|| format!("load assets from {}", options.assets.display()))?;
    let seed = options
        .seed
        .unwrap_or_else(|| RngState::from_entropy().seed());
    log::info!("reel seed {seed}");
    Ok((assets, seed))
}

impl Session {
    pub fn open(options: SessionOptions) -> anyhow::Result<Self> {
        let (assets, seed) = open_assets(&options)?;
        let mut machine = Machine::new(assets.table, assets.config, seed)?;
        let state_path = options.state_path.or_else(default_state_path);
        let mut leaderboard = Leaderboard::new();
        if let Some(path) = state_path.as_deref().filter(|path| path.exists()) {
            match load_state_file(path) {
                Ok(saved) => leaderboard = saved.restore(&mut machine),
                Err(err) => eprintln!("ignoring save file: {err:#}"),
            }
        }
        let history = options
            .scores_dir
            .or_else(default_history_dir)
            .map(FileScoreHistory::new);
        Ok(Self {
            machine,
            leaderboard,
            events: EventBus::default(),
            state_path,
            history,
            animate: options.animate,
        })
    }

    pub fn run_interactive(&mut self) -> anyhow::Result<()> {
        println!("{}", self.machine.rules_text());
        self.print_status();
        println!("type `help` for commands");
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            if let Err(err) = self.execute(command, &mut lines) {
                eprintln!("{err:#}");
            }
            for event in self.events.drain() {
                log::debug!("event: {event:?}");
            }
        }
        self.save_state()
    }

    fn execute<I>(&mut self, command: Command, lines: &mut I) -> anyhow::Result<()>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        match command {
            Command::Spin => self.spin()?,
            Command::Reels(value) => {
                let reels = self.machine.set_reel_count(value, &mut self.events);
                println!("reels: {reels}");
                println!("{}", self.machine.rules_text());
                let preview = self.machine.preview_reels();
                self.print_reels(&preview);
            }
            Command::Bet(value) => {
                let bet = self.machine.set_bet(value, &mut self.events);
                println!("bet: {bet}");
            }
            Command::Jackpot(value) => {
                self.machine.set_base_jackpot(value, &mut self.events)?;
                println!("{}", self.machine.rules_text());
            }
            Command::Add => {
                let balance = self.machine.credit(TOP_UP, &mut self.events)?;
                println!("balance: {balance}");
            }
            Command::Reset => {
                if confirm(lines, "Reset balance to 0?")? {
                    self.machine.reset_balance(&mut self.events);
                    println!("balance: 0");
                }
            }
            Command::Rules => println!("{}", self.machine.rules_text()),
            Command::Balance => self.print_status(),
            Command::Name(name) => {
                self.machine.player_name = name.trim().to_string();
                println!("name saved");
            }
            Command::SaveScore => {
                let entry = self.machine.score_entry(now_millis());
                let name = entry.name.clone();
                let score = entry.score;
                let rank = self.leaderboard.record(entry);
                self.events.push(Event::ScoreSaved { name, score, rank });
                match rank {
                    Some(rank) => println!("saved to device leaderboard (#{})", rank + 1),
                    None => println!("score did not make the device leaderboard"),
                }
            }
            Command::Board => self.print_board(),
            Command::ClearBoard => {
                if confirm(lines, "Clear local leaderboard?")? {
                    self.leaderboard.clear();
                    self.events.push(Event::LeaderboardCleared);
                    println!("leaderboard cleared");
                }
            }
            Command::Push(user) => {
                let entry = self.machine.score_entry(now_millis());
                self.history_mut()?.push(&user, entry)?;
                println!("saved to {user}'s score history");
            }
            Command::Pull(user) => {
                let entries = self.history_mut()?.top(&user, HISTORY_DISPLAY)?;
                if entries.is_empty() {
                    println!("no saved scores for {user}");
                }
                for entry in entries {
                    println!("{:>8}  reels:{}", entry.score, entry.reels);
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
        self.save_state()
    }

    fn spin(&mut self) -> anyhow::Result<()> {
        let bet = self.machine.config.bet;
        if self.machine.balance < bet {
            println!("Not enough points");
            return Ok(());
        }
        if self.animate {
            for _ in 0..SPIN_FRAMES {
                let frame = self.machine.preview_reels();
                print!("\r{}", frame.join(" "));
                io::stdout().flush()?;
                thread::sleep(FRAME_DELAY);
            }
            println!();
        }
        match self.machine.spin(&mut self.events) {
            Ok(outcome) => print_outcome(&outcome),
            Err(MachineError::InsufficientFunds { .. }) => println!("Not enough points"),
            Err(err) => return Err(err.into()),
        }
        self.print_status();
        Ok(())
    }

    fn history_mut(&mut self) -> anyhow::Result<&mut FileScoreHistory> {
        self.history
            .as_mut()
            .ok_or_else(|| anyhow!("no score history directory"))
    }

    fn save_state(&self) -> anyhow::Result<()> {
        let Some(path) = self.state_path.as_deref() else {
            return Ok(());
        };
        let state = SavedMachineState::capture(&self.machine, &self.leaderboard);
        save_state_file(&state, path)
    }

    fn print_status(&self) {
        println!(
            "balance: {}  bet: {}  reels: {}  jackpot: {}",
            self.machine.balance,
            self.machine.config.bet,
            self.machine.config.reel_count,
            self.machine.current_jackpot()
        );
    }

    fn print_reels(&self, reels: &[String]) {
        println!("{}", reels.join(" "));
    }

    fn print_board(&self) {
        if self.leaderboard.is_empty() {
            println!("No entries yet.");
            return;
        }
        for (idx, entry) in self.leaderboard.top(LEADERBOARD_DISPLAY).iter().enumerate() {
            println!(
                "#{:<3} {:<20} {:>8}  reels:{}",
                idx + 1,
                entry.name,
                entry.score,
                entry.reels
            );
        }
    }
}

fn print_outcome(outcome: &SpinOutcome) {
    let reels = outcome.draw.join(" ");
    let settlement = &outcome.settlement;
    if settlement.is_jackpot {
        println!("JACKPOT {} pts  {reels}", settlement.payout);
    } else if settlement.is_win() {
        println!("Win {} pts  {reels}", settlement.payout);
    } else {
        println!("No win  {reels}");
    }
}

fn confirm<I>(lines: &mut I, prompt: &str) -> anyhow::Result<bool>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let answer = lines.next().transpose()?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
