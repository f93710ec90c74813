use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    SpinStarted {
        bet: i64,
        reel_count: u32,
        balance: i64,
    },
    SpinSettled {
        draw: Vec<String>,
        payout: i64,
        is_jackpot: bool,
        balance: i64,
    },
    BalanceCredited { amount: i64, balance: i64 },
    BalanceReset,
    ConfigChanged {
        reel_count: u32,
        bet: i64,
        base_jackpot: f64,
    },
    ScoreSaved {
        name: String,
        score: i64,
        rank: Option<usize>,
    },
    LeaderboardCleared,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
