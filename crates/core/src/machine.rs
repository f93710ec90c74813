use crate::{
    clamp_bet, clamp_reel_count, jackpot_for, ConfigError, Event, EventBus, MachineConfig,
    PayoutEngine, PayoutError, RngState, ScoreEntry, SettlementResult, SymbolTable,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MachineError {
    #[error("not enough points: balance {balance}, bet {bet}")]
    InsufficientFunds { balance: i64, bet: i64 },
    #[error("credit must be positive, got {0}")]
    NonPositiveCredit(i64),
    #[error("payout error: {0}")]
    Payout(#[from] PayoutError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub draw: Vec<String>,
    pub settlement: SettlementResult,
    pub bet: i64,
    pub balance: i64,
}

/// One player's machine: catalog, settings, RNG and point balance.
#[derive(Debug)]
pub struct Machine {
    pub table: SymbolTable,
    pub config: MachineConfig,
    pub rng: RngState,
    pub balance: i64,
    pub player_name: String,
}

impl Machine {
    pub fn new(table: SymbolTable, config: MachineConfig, seed: u64) -> Result<Self, MachineError> {
        config.validate()?;
        Ok(Self {
            table,
            config,
            rng: RngState::from_seed(seed),
            balance: 0,
            player_name: String::new(),
        })
    }

    pub fn engine(&self) -> PayoutEngine<'_> {
        PayoutEngine::new(&self.table)
    }

    /// Takes the bet, draws every reel, settles and credits the win.
    pub fn spin(&mut self, events: &mut EventBus) -> Result<SpinOutcome, MachineError> {
        let context = self.config.bet_context();
        if self.balance < context.bet {
            return Err(MachineError::InsufficientFunds {
                balance: self.balance,
                bet: context.bet,
            });
        }
        self.balance -= context.bet;
        events.push(Event::SpinStarted {
            bet: context.bet,
            reel_count: context.reel_count,
            balance: self.balance,
        });

        let draw = self.table.draw(&mut self.rng, context.reel_count);
        let settlement = match PayoutEngine::new(&self.table).resolve(&draw, &context) {
            Ok(settlement) => settlement,
            Err(err) => {
                self.balance += context.bet;
                return Err(err.into());
            }
        };
        self.balance = self.balance.saturating_add(settlement.payout);

        log::debug!(
            "spin bet={} reels={} draw=[{}] payout={} balance={}",
            context.bet,
            context.reel_count,
            draw.join(" "),
            settlement.payout,
            self.balance
        );
        if settlement.is_jackpot {
            log::info!(
                "jackpot on {} reels: {} pts",
                context.reel_count,
                settlement.payout
            );
        }
        events.push(Event::SpinSettled {
            draw: draw.clone(),
            payout: settlement.payout,
            is_jackpot: settlement.is_jackpot,
            balance: self.balance,
        });
        Ok(SpinOutcome {
            draw,
            settlement,
            bet: context.bet,
            balance: self.balance,
        })
    }

    /// Random symbols for idle reels and animation frames. Never settled.
    pub fn preview_reels(&mut self) -> Vec<String> {
        self.table.draw(&mut self.rng, self.config.reel_count)
    }

    pub fn credit(&mut self, amount: i64, events: &mut EventBus) -> Result<i64, MachineError> {
        if amount <= 0 {
            return Err(MachineError::NonPositiveCredit(amount));
        }
        self.balance = self.balance.saturating_add(amount);
        events.push(Event::BalanceCredited {
            amount,
            balance: self.balance,
        });
        Ok(self.balance)
    }

    pub fn reset_balance(&mut self, events: &mut EventBus) {
        self.balance = 0;
        events.push(Event::BalanceReset);
    }

    pub fn set_reel_count(&mut self, value: i64, events: &mut EventBus) -> u32 {
        self.config.reel_count = clamp_reel_count(value);
        self.config_changed(events);
        self.config.reel_count
    }

    pub fn set_bet(&mut self, value: i64, events: &mut EventBus) -> i64 {
        self.config.bet = clamp_bet(value);
        self.config_changed(events);
        self.config.bet
    }

    pub fn set_base_jackpot(&mut self, value: f64, events: &mut EventBus) -> Result<(), MachineError> {
        let candidate = MachineConfig {
            base_jackpot: value,
            ..self.config.clone()
        };
        candidate.validate()?;
        self.config = candidate;
        self.config_changed(events);
        Ok(())
    }

    pub fn current_jackpot(&self) -> i64 {
        jackpot_for(self.config.reel_count, self.config.base_jackpot)
    }

    pub fn rules_text(&self) -> String {
        format!(
            "All-match = Jackpot {} pts. Rarer symbols pay more on 2+ matches.",
            self.current_jackpot()
        )
    }

    pub fn score_entry(&self, at: u64) -> ScoreEntry {
        ScoreEntry::new(&self.player_name, self.balance, self.config.reel_count, at)
    }

    fn config_changed(&self, events: &mut EventBus) {
        events.push(Event::ConfigChanged {
            reel_count: self.config.reel_count,
            bet: self.config.bet,
            base_jackpot: self.config.base_jackpot,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn machine(seed: u64) -> Machine {
        Machine::new(SymbolTable::classic(), MachineConfig::default(), seed).expect("machine")
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = MachineConfig {
            reel_count: 1,
            ..MachineConfig::default()
        };
        let err = Machine::new(SymbolTable::classic(), config, 0).unwrap_err();
        assert!(matches!(
            err,
            MachineError::Config(ConfigError::ReelCountOutOfRange(1))
        ));
    }

    #[test]
    fn spin_without_funds_keeps_balance() {
        let mut machine = machine(1);
        let mut events = EventBus::default();
        machine.balance = 9;
        let err = machine.spin(&mut events).unwrap_err();
        assert!(matches!(
            err,
            MachineError::InsufficientFunds { balance: 9, bet: 10 }
        ));
        assert_eq!(machine.balance, 9);
        assert!(events.is_empty());
    }

    #[test]
    fn spin_deducts_bet_then_credits_payout() {
        let mut machine = machine(7);
        let mut events = EventBus::default();
        machine.credit(1_000, &mut events).expect("credit");
        for _ in 0..50 {
            let before = machine.balance;
            let outcome = machine.spin(&mut events).expect("spin");
            assert_eq!(outcome.draw.len(), 5);
            assert_eq!(outcome.balance, before - 10 + outcome.settlement.payout);
            assert_eq!(machine.balance, outcome.balance);
            let expected = machine
                .engine()
                .resolve(&outcome.draw, &machine.config.bet_context())
                .expect("resolve");
            assert_eq!(outcome.settlement, expected);
        }
        let settled = events
            .drain()
            .filter(|event| matches!(event, Event::SpinSettled { .. }))
            .count();
        assert_eq!(settled, 50);
    }

    #[test]
    fn same_seed_replays_same_spins() {
        let mut a = machine(99);
        let mut b = machine(99);
        let mut events = EventBus::default();
        a.balance = 500;
        b.balance = 500;
        for _ in 0..20 {
            let left = a.spin(&mut events).expect("spin");
            let right = b.spin(&mut events).expect("spin");
            assert_eq!(left, right);
        }
    }

    #[test]
    fn setters_clamp_and_report() {
        let mut machine = machine(0);
        let mut events = EventBus::default();
        assert_eq!(machine.set_reel_count(50, &mut events), 20);
        assert_eq!(machine.set_reel_count(1, &mut events), 3);
        assert_eq!(machine.set_bet(0, &mut events), 1);
        assert!(machine.set_base_jackpot(-1.0, &mut events).is_err());
        assert_eq!(machine.config.base_jackpot, 1000.0);
        machine
            .set_base_jackpot(2000.0, &mut events)
            .expect("jackpot");
        assert_eq!(machine.current_jackpot(), 2000);
        assert_eq!(events.drain().count(), 4);
    }

    #[test]
    fn huge_jackpot_saturates_balance() {
        let table = SymbolTable::new(vec![Symbol::new("x", 1, [1.0, 2.0, 3.0, 4.0])])
            .expect("table");
        let mut machine = Machine::new(table, MachineConfig::default(), 4).expect("machine");
        let mut events = EventBus::default();
        machine
            .set_base_jackpot(1e300, &mut events)
            .expect("finite jackpot is accepted");
        machine.balance = 20;
        let outcome = machine.spin(&mut events).expect("spin");
        assert!(outcome.settlement.is_jackpot);
        assert_eq!(outcome.settlement.payout, i64::MAX);
        assert_eq!(machine.balance, i64::MAX);
        let again = machine.spin(&mut events).expect("second spin");
        assert_eq!(again.balance, i64::MAX);
    }

    #[test]
    fn rules_text_shows_scaled_jackpot() {
        let mut machine = machine(0);
        machine.set_reel_count(10, &mut EventBus::default());
        assert_eq!(
            machine.rules_text(),
            "All-match = Jackpot 6086 pts. Rarer symbols pay more on 2+ matches."
        );
    }

    #[test]
    fn credit_and_reset() {
        let mut machine = machine(0);
        let mut events = EventBus::default();
        assert_eq!(machine.credit(100, &mut events).expect("credit"), 100);
        assert!(machine.credit(0, &mut events).is_err());
        machine.reset_balance(&mut events);
        assert_eq!(machine.balance, 0);
        let collected: Vec<Event> = events.drain().collect();
        assert_eq!(
            collected,
            vec![
                Event::BalanceCredited {
                    amount: 100,
                    balance: 100
                },
                Event::BalanceReset
            ]
        );
    }

    #[test]
    fn score_entry_uses_anon_for_blank_name() {
        let mut machine = machine(0);
        machine.balance = 321;
        let entry = machine.score_entry(1234);
        assert_eq!(entry.name, "Anon");
        assert_eq!(entry.score, 321);
        assert_eq!(entry.reels, 5);
        assert_eq!(entry.at, 1234);
    }
}
