use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use reelcade_core::{Leaderboard, MachineConfig, PayTable, ScoreEntry, Symbol};

/// Symbol as authored in `symbols.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDef {
    pub icon: String,
    pub weight: u32,
    pub pay: BTreeMap<u32, f64>,
}

impl SymbolDef {
    pub fn to_symbol(&self) -> Symbol {
        Symbol {
            id: self.icon.clone(),
            weight: self.weight,
            pay: PayTable::new(self.pay.iter().map(|(count, ratio)| (*count, *ratio))),
        }
    }
}

impl From<&Symbol> for SymbolDef {
    fn from(symbol: &Symbol) -> Self {
        Self {
            icon: symbol.id.clone(),
            weight: symbol.weight,
            pay: symbol.pay.entries().collect(),
        }
    }
}
