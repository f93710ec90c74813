use reelcade_core::{EventBus, Machine};

const AUTO_TOP_UP: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoSummary {
    pub spins: u32,
    pub wins: u32,
    pub jackpots: u32,
    pub wagered: i64,
    pub paid: i64,
    pub biggest_win: i64,
    pub top_ups: u32,
    pub balance: i64,
}

impl AutoSummary {
    pub fn return_ratio(&self) -> f64 {
        if self.wagered == 0 {
            return 0.0;
        }
        self.paid as f64 / self.wagered as f64
    }
}

/// Spins back to back, topping the balance up whenever it cannot cover a bet.
pub fn simulate(machine: &mut Machine, spins: u32) -> anyhow::Result<AutoSummary> {
    let mut events = EventBus::default();
    let mut summary = AutoSummary::default();
    for _ in 0..spins {
        if machine.balance < machine.config.bet {
            let needed = machine.config.bet - machine.balance;
            machine.credit(needed.max(AUTO_TOP_UP), &mut events)?;
            summary.top_ups += 1;
        }
        let outcome = machine.spin(&mut events)?;
        summary.spins += 1;
        summary.wagered = summary.wagered.saturating_add(outcome.bet);
        summary.paid = summary.paid.saturating_add(outcome.settlement.payout);
        if outcome.settlement.is_win() {
            summary.wins += 1;
        }
        if outcome.settlement.is_jackpot {
            summary.jackpots += 1;
        }
        summary.biggest_win = summary.biggest_win.max(outcome.settlement.payout);
        events.drain().for_each(drop);
    }
    summary.balance = machine.balance;
    Ok(summary)
}
