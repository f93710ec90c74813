use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Smallest group that pays.
pub const MIN_MATCH: u32 = 2;
/// Largest match-count with its own ratio; bigger groups saturate here.
pub const MAX_MATCH: u32 = 5;

/// Payout ratios keyed by match-count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PayTable(BTreeMap<u32, f64>);

impl PayTable {
    pub fn new(entries: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Ratios for 2, 3, 4 and 5 of a kind, in that order.
    pub fn from_ratios(ratios: [f64; 4]) -> Self {
        Self::new((MIN_MATCH..=MAX_MATCH).zip(ratios))
    }

    /// Groups smaller than a pair pay nothing and groups above five read the
    /// five-of-a-kind entry. A count with no entry pays nothing.
    pub fn ratio(&self, match_count: u32) -> f64 {
        if match_count < MIN_MATCH {
            return 0.0;
        }
        let key = match_count.min(MAX_MATCH);
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    pub fn entries(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0.iter().map(|(count, ratio)| (*count, *ratio))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Symbol {
    pub id: String,
    pub weight: u32,
    pub pay: PayTable,
}

impl Symbol {
    pub fn new(id: impl Into<String>, weight: u32, ratios: [f64; 4]) -> Self {
        Self {
            id: id.into(),
            weight,
            pay: PayTable::from_ratios(ratios),
        }
    }
}

pub fn classic_symbols() -> Vec<Symbol> {
    vec![
        Symbol::new("🍒", 6, [5.0, 20.0, 40.0, 80.0]),
        Symbol::new("🍋", 6, [5.0, 15.0, 30.0, 60.0]),
        Symbol::new("🍊", 6, [5.0, 15.0, 30.0, 60.0]),
        Symbol::new("🔔", 4, [10.0, 30.0, 80.0, 160.0]),
        Symbol::new("⭐", 3, [20.0, 60.0, 150.0, 300.0]),
        Symbol::new("💎", 2, [30.0, 100.0, 250.0, 500.0]),
        Symbol::new("7️⃣", 1, [50.0, 200.0, 500.0, 1000.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_below_pair_is_zero() {
        let pay = PayTable::from_ratios([5.0, 20.0, 40.0, 80.0]);
        assert_eq!(pay.ratio(0), 0.0);
        assert_eq!(pay.ratio(1), 0.0);
        assert_eq!(pay.ratio(2), 5.0);
    }

    #[test]
    fn ratio_saturates_above_five() {
        let pay = PayTable::from_ratios([5.0, 20.0, 40.0, 80.0]);
        for count in 5..=20 {
            assert_eq!(pay.ratio(count), 80.0);
        }
    }

    #[test]
    fn missing_entry_pays_nothing() {
        let pay = PayTable::new([(2, 1.0), (5, 9.0)]);
        assert_eq!(pay.ratio(3), 0.0);
        assert_eq!(pay.ratio(4), 0.0);
        assert_eq!(pay.ratio(6), 9.0);
    }

    #[test]
    fn pay_table_reads_string_keys() {
        let pay: PayTable =
            serde_json::from_str(r#"{"2": 5, "3": 20, "4": 40, "5": 80}"#).expect("parse");
        assert_eq!(pay, PayTable::from_ratios([5.0, 20.0, 40.0, 80.0]));
    }
}
