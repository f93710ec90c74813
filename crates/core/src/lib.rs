//! Slot rules: symbol catalog, payout settlement, jackpot scaling and the
//! machine session. Keep this crate free of IO and platform concerns.

pub mod config;
pub mod events;
pub mod history;
pub mod jackpot;
pub mod leaderboard;
pub mod machine;
pub mod payout;
pub mod rng;
pub mod symbols;
pub mod table;

pub use config::*;
pub use events::*;
pub use history::*;
pub use jackpot::*;
pub use leaderboard::*;
pub use machine::*;
pub use payout::*;
pub use rng::*;
pub use symbols::*;
pub use table::*;
