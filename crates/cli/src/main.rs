mod auto;
mod command;
mod session;

use clap::Parser;
use reelcade_core::Machine;
use session::{open_assets, Session, SessionOptions};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "reelcade", about = "Slot machine with a local leaderboard")]
struct CliOptions {
    /// Reel RNG seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Save file. Defaults to $REELCADE_SAVE or ~/.reelcade_state.json.
    #[arg(long)]
    state: Option<PathBuf>,
    /// Per-user score history directory.
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Spin this many times unattended and print a summary.
    #[arg(long, value_name = "SPINS")]
    auto: Option<u32>,
    #[arg(long)]
    no_animate: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = CliOptions::parse();
    let options = SessionOptions {
        assets: cli.assets,
        seed: cli.seed,
        state_path: cli.state,
        scores_dir: cli.scores,
        animate: !cli.no_animate,
    };
    match cli.auto {
        Some(spins) => run_auto(&options, spins),
        None => Session::open(options)?.run_interactive(),
    }
}

fn run_auto(options: &SessionOptions, spins: u32) -> anyhow::Result<()> {
    let (assets, seed) = open_assets(options)?;
    let mut machine = Machine::new(assets.table, assets.config, seed)?;
    println!("seed: {seed}");
    println!("{}", machine.rules_text());
    let summary = auto::simulate(&mut machine, spins)?;
    println!("spins: {}", summary.spins);
    println!("wins: {} (jackpots: {})", summary.wins, summary.jackpots);
    println!("wagered: {}  paid: {}", summary.wagered, summary.paid);
    println!("return: {:.2}%", summary.return_ratio() * 100.0);
    println!("biggest win: {}", summary.biggest_win);
    println!("top-ups: {}  final balance: {}", summary.top_ups, summary.balance);
    Ok(())
}
