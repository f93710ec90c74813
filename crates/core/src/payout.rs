use crate::{jackpot_for, jackpot_raw, SymbolTable, UnknownSymbol, MAX_MATCH, MIN_MATCH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `base_jackpot` must be finite and positive; `resolve` rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetContext {
    pub bet: i64,
    pub reel_count: u32,
    pub base_jackpot: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningGroup {
    pub symbol: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub payout: i64,
    pub is_jackpot: bool,
    #[serde(default)]
    pub winning: Option<WinningGroup>,
}

impl SettlementResult {
    pub fn no_win() -> Self {
        Self {
            payout: 0,
            is_jackpot: false,
            winning: None,
        }
    }

    pub fn is_win(&self) -> bool {
        self.payout > 0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("draw is empty")]
    Empty,
    #[error("draw has {actual} reels, expected {expected}")]
    LengthMismatch { expected: u32, actual: usize },
    #[error(transparent)]
    UnknownSymbol(#[from] UnknownSymbol),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PayoutError {
    #[error("invalid bet {0}: must be positive")]
    InvalidBet(i64),
    #[error("invalid base jackpot {0}: must be finite and positive")]
    InvalidJackpot(f64),
    #[error("invalid draw: {0}")]
    InvalidDraw(#[from] DrawError),
}

impl From<UnknownSymbol> for PayoutError {
    fn from(value: UnknownSymbol) -> Self {
        Self::InvalidDraw(DrawError::UnknownSymbol(value))
    }
}

/// Settles finished draws against a symbol table.
#[derive(Debug, Clone, Copy)]
pub struct PayoutEngine<'t> {
    table: &'t SymbolTable,
}

impl<'t> PayoutEngine<'t> {
    pub fn new(table: &'t SymbolTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t SymbolTable {
        self.table
    }

    pub fn jackpot_for(&self, reel_count: u32, base_jackpot: f64) -> i64 {
        jackpot_for(reel_count, base_jackpot)
    }

    /// An all-equal draw pays the scaled jackpot and never reaches the match
    /// table. Anything else pays the single best group of two or more, not
    /// the sum of groups. The payout is rounded once, at the end.
    pub fn resolve<S: AsRef<str>>(
        &self,
        draw: &[S],
        context: &BetContext,
    ) -> Result<SettlementResult, PayoutError> {
        if context.bet <= 0 {
            return Err(PayoutError::InvalidBet(context.bet));
        }
        if !(context.base_jackpot.is_finite() && context.base_jackpot > 0.0) {
            return Err(PayoutError::InvalidJackpot(context.base_jackpot));
        }
        let first = draw.first().ok_or(DrawError::Empty)?.as_ref();
        if draw.len() != context.reel_count as usize {
            return Err(DrawError::LengthMismatch {
                expected: context.reel_count,
                actual: draw.len(),
            }
            .into());
        }
        if let Some(unknown) = draw.iter().find(|id| !self.table.contains(id.as_ref())) {
            return Err(UnknownSymbol(unknown.as_ref().to_string()).into());
        }

        let bet = context.bet as f64;
        if draw.iter().all(|id| id.as_ref() == first) {
            let payout = (jackpot_raw(context.reel_count, context.base_jackpot) * bet).round();
            return Ok(SettlementResult {
                payout: payout as i64,
                is_jackpot: true,
                winning: Some(WinningGroup {
                    symbol: first.to_string(),
                    count: draw.len() as u32,
                }),
            });
        }

        let mut best = 0.0;
        let mut winning = None;
        for (id, count) in match_counts(draw) {
            if count < MIN_MATCH {
                continue;
            }
            let candidate = self.table.payout_ratio(id, count.min(MAX_MATCH))? * bet;
            // Strictly greater: on a tie the group seen first in the draw stays.
            if candidate > best {
                best = candidate;
                winning = Some(WinningGroup {
                    symbol: id.to_string(),
                    count,
                });
            }
        }
        Ok(SettlementResult {
            payout: best.round() as i64,
            is_jackpot: false,
            winning,
        })
    }
}

/// Occurrences per distinct id, in order of first appearance.
fn match_counts<S: AsRef<str>>(draw: &[S]) -> Vec<(&str, u32)> {
    let mut counts: Vec<(&str, u32)> = Vec::new();
    for id in draw {
        let id = id.as_ref();
        match counts.iter_mut().find(|(seen, _)| *seen == id) {
            Some((_, count)) => *count += 1,
            None => counts.push((id, 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn context(bet: i64, reel_count: u32) -> BetContext {
        BetContext {
            bet,
            reel_count,
            base_jackpot: 1000.0,
        }
    }

    #[test]
    fn match_counts_keep_first_appearance_order() {
        let counts = match_counts(&["b", "a", "b", "c", "a", "b"]);
        assert_eq!(counts, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn tie_reports_first_group_in_draw() {
        let table = SymbolTable::classic();
        let engine = PayoutEngine::new(&table);
        // 🍒@3 and ⭐@2 both pay 20.
        let result = engine
            .resolve(&["⭐", "🍒", "⭐", "🍒", "🍒"], &context(1, 5))
            .expect("resolve");
        assert_eq!(result.payout, 20);
        assert_eq!(
            result.winning,
            Some(WinningGroup {
                symbol: "⭐".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn zero_ratio_group_reports_no_winner() {
        let table = SymbolTable::new(vec![
            Symbol {
                id: "x".to_string(),
                weight: 1,
                pay: crate::PayTable::new([(3, 4.0)]),
            },
            Symbol::new("y", 1, [1.0, 2.0, 3.0, 4.0]),
        ])
        .expect("table");
        let engine = PayoutEngine::new(&table);
        let result = engine
            .resolve(&["x", "x", "y"], &context(10, 3))
            .expect("resolve");
        assert_eq!(result, SettlementResult::no_win());
    }

    #[test]
    fn fractional_ratio_rounds_once_at_the_end() {
        let table = SymbolTable::new(vec![
            Symbol::new("x", 1, [0.25, 1.0, 1.0, 1.0]),
            Symbol::new("y", 1, [1.0, 1.0, 1.0, 1.0]),
        ])
        .expect("table");
        let engine = PayoutEngine::new(&table);
        // 0.25 * 6 = 1.5 rounds away from zero.
        let result = engine
            .resolve(&["x", "x", "y"], &context(6, 3))
            .expect("resolve");
        assert_eq!(result.payout, 2);
    }

    #[test]
    fn length_mismatch_is_invalid_draw() {
        let table = SymbolTable::classic();
        let engine = PayoutEngine::new(&table);
        let err = engine
            .resolve(&["🍒", "🍒", "🍒"], &context(1, 5))
            .unwrap_err();
        assert_eq!(
            err,
            PayoutError::InvalidDraw(DrawError::LengthMismatch {
                expected: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn empty_draw_is_invalid() {
        let table = SymbolTable::classic();
        let engine = PayoutEngine::new(&table);
        let draw: [&str; 0] = [];
        assert_eq!(
            engine.resolve(&draw, &context(1, 0)).unwrap_err(),
            PayoutError::InvalidDraw(DrawError::Empty)
        );
    }

    #[test]
    fn negative_bet_is_rejected_before_draw_checks() {
        let table = SymbolTable::classic();
        let engine = PayoutEngine::new(&table);
        let draw: [&str; 0] = [];
        assert_eq!(
            engine.resolve(&draw, &context(-5, 3)).unwrap_err(),
            PayoutError::InvalidBet(-5)
        );
    }

    #[test]
    fn non_positive_or_nan_jackpot_is_rejected() {
        let table = SymbolTable::classic();
        let engine = PayoutEngine::new(&table);
        for base_jackpot in [-1000.0, 0.0, f64::INFINITY] {
            let context = BetContext {
                bet: 10,
                reel_count: 3,
                base_jackpot,
            };
            assert_eq!(
                engine.resolve(&["🍒", "🍒", "🍒"], &context).unwrap_err(),
                PayoutError::InvalidJackpot(base_jackpot)
            );
        }
        let context = BetContext {
            bet: 10,
            reel_count: 3,
            base_jackpot: f64::NAN,
        };
        assert!(matches!(
            engine.resolve(&["🍒", "🍒", "🍒"], &context),
            Err(PayoutError::InvalidJackpot(value)) if value.is_nan()
        ));
    }

    #[test]
    fn unknown_symbol_in_all_equal_draw_is_still_rejected() {
        let table = SymbolTable::classic();
        let engine = PayoutEngine::new(&table);
        let err = engine
            .resolve(&["🍉", "🍉", "🍉"], &context(1, 3))
            .unwrap_err();
        assert_eq!(
            err,
            PayoutError::InvalidDraw(DrawError::UnknownSymbol(UnknownSymbol(
                "🍉".to_string()
            )))
        );
    }
}
