use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Grape,
    Bell,
    Seven,
}

impl Symbol {
    pub const ALL: [Symbol; 6] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Orange,
        Symbol::Grape,
        Symbol::Bell,
        Symbol::Seven,
    ];

    pub fn from_index(i: u8) -> Self {
        Self::ALL[i as usize % Self::ALL.len()]
    }

    pub fn to_index(self) -> u8 {
        match self {
            Symbol::Cherry => 0,
            Symbol::Lemon => 1,
            Symbol::Orange => 2,
            Symbol::Grape => 3,
            Symbol::Bell => 4,
            Symbol::Seven => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeightedSymbol {
    pub symbol: Symbol,
    pub weight: u32,
}

/// Weighted symbol table for one reel (one grid cell).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReelConfig {
    pub symbols: Vec<WeightedSymbol>,
}

impl ReelConfig {
    pub fn new(symbols: Vec<WeightedSymbol>) -> Self {
        Self { symbols }
    }

    pub fn default_table() -> Self {
        let weighted = |symbol, weight| WeightedSymbol { symbol, weight };
        Self::new(vec![
            weighted(Symbol::Cherry, 30),
            weighted(Symbol::Lemon, 25),
            weighted(Symbol::Orange, 20),
            weighted(Symbol::Grape, 15),
            weighted(Symbol::Bell, 7),
            weighted(Symbol::Seven, 3),
        ])
    }

    pub fn total_weight(&self) -> u64 {
        self.symbols.iter().map(|s| u64::from(s.weight)).sum()
    }

    /// Walks the table until the running weight exceeds `r`.
    ///
    /// `r` must be below [`ReelConfig::total_weight`]; anything else yields `None`.
    pub fn pick(&self, r: u64) -> Option<Symbol> {
        let mut acc = 0u64;
        for entry in &self.symbols {
            acc += u64::from(entry.weight);
            if acc > r {
                return Some(entry.symbol);
            }
        }
        None
    }

    /// Probability of drawing `symbol` from this reel.
    pub fn probability(&self, symbol: Symbol) -> f64 {
        let total = self.total_weight();
        if total == 0 {
            return 0.0;
        }
        let weight: u64 = self
            .symbols
            .iter()
            .filter(|s| s.symbol == symbol)
            .map(|s| u64::from(s.weight))
            .sum();
        weight as f64 / total as f64
    }
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self::default_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_walks_cumulative_weights() {
        let reel = ReelConfig::default_table();
        assert_eq!(reel.total_weight(), 100);
        assert_eq!(reel.pick(0), Some(Symbol::Cherry));
        assert_eq!(reel.pick(29), Some(Symbol::Cherry));
        assert_eq!(reel.pick(30), Some(Symbol::Lemon));
        assert_eq!(reel.pick(96), Some(Symbol::Bell));
        assert_eq!(reel.pick(97), Some(Symbol::Seven));
        assert_eq!(reel.pick(99), Some(Symbol::Seven));
        assert_eq!(reel.pick(100), None);
    }

    #[test]
    fn zero_weight_symbols_never_drawn() {
        let reel = ReelConfig::new(vec![
            WeightedSymbol {
                symbol: Symbol::Seven,
                weight: 0,
            },
            WeightedSymbol {
                symbol: Symbol::Lemon,
                weight: 4,
            },
        ]);
        for r in 0..4 {
            assert_eq!(reel.pick(r), Some(Symbol::Lemon));
        }
        assert_eq!(reel.probability(Symbol::Seven), 0.0);
    }

    #[test]
    fn index_round_trip() {
        for s in Symbol::ALL {
            assert_eq!(Symbol::from_index(s.to_index()), s);
        }
    }
}
