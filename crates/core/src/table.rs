use crate::{classic_symbols, jackpot_for, Symbol};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("symbol catalog is empty")]
    EmptyCatalog,
    #[error("symbol {0:?} has zero weight")]
    ZeroWeight(String),
    #[error("duplicate symbol {0:?}")]
    DuplicateSymbol(String),
    #[error("total symbol weight overflows")]
    WeightOverflow,
    #[error("weighted pool: {0}")]
    Pool(#[from] WeightedError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown symbol {0:?}")]
pub struct UnknownSymbol(pub String);

/// Read-only symbol catalog with its weighted sampling pool.
///
/// The table never changes after construction; sampling takes the caller's
/// RNG, so one table can be shared by reference across threads.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    pool: WeightedIndex<u32>,
    total_weight: u32,
}

impl SymbolTable {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, CatalogError> {
        if symbols.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let mut index = HashMap::with_capacity(symbols.len());
        let mut total_weight: u32 = 0;
        for (idx, symbol) in symbols.iter().enumerate() {
            if symbol.weight == 0 {
                return Err(CatalogError::ZeroWeight(symbol.id.clone()));
            }
            if index.insert(symbol.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateSymbol(symbol.id.clone()));
            }
            total_weight = total_weight
                .checked_add(symbol.weight)
                .ok_or(CatalogError::WeightOverflow)?;
        }
        let pool = WeightedIndex::new(symbols.iter().map(|symbol| symbol.weight))?;
        log::debug!(
            "symbol table built: {} symbols, total weight {}",
            symbols.len(),
            total_weight
        );
        Ok(Self {
            symbols,
            index,
            pool,
            total_weight,
        })
    }

    pub fn classic() -> Self {
        Self::new(classic_symbols()).expect("built-in catalog is valid")
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.symbols[self.pool.sample(rng)].id
    }

    /// Endless stream of independent samples.
    pub fn samples<'a, R: Rng + 'a>(&'a self, mut rng: R) -> impl Iterator<Item = &'a str> + 'a {
        std::iter::repeat_with(move || self.sample(&mut rng))
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, reel_count: u32) -> Vec<String> {
        (0..reel_count)
            .map(|_| self.sample(rng).to_string())
            .collect()
    }

    pub fn payout_ratio(&self, id: &str, match_count: u32) -> Result<f64, UnknownSymbol> {
        let symbol = self.get(id).ok_or_else(|| UnknownSymbol(id.to_string()))?;
        Ok(symbol.pay.ratio(match_count))
    }

    pub fn get(&self, id: &str) -> Option<&Symbol> {
        self.index.get(id).map(|idx| &self.symbols[*idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    pub fn probability(&self, id: &str) -> Option<f64> {
        self.get(id)
            .map(|symbol| f64::from(symbol.weight) / f64::from(self.total_weight))
    }

    /// Full-match payout ratio for a reel width. Independent of the catalog.
    pub fn jackpot_for(&self, reel_count: u32, base_jackpot: f64) -> i64 {
        jackpot_for(reel_count, base_jackpot)
    }
}
