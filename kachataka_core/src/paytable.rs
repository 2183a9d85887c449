use crate::symbols::Symbol;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PaytableEntry {
    pub symbol: Symbol,
    /// Multiple of the bet paid for three matching symbols on a line.
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paytable(pub Vec<PaytableEntry>);

impl Paytable {
    pub fn simple_default() -> Self {
        let entry = |symbol, value| PaytableEntry { symbol, value };
        Self(vec![
            entry(Symbol::Cherry, 2.0),
            entry(Symbol::Lemon, 3.0),
            entry(Symbol::Orange, 5.0),
            entry(Symbol::Grape, 8.0),
            entry(Symbol::Bell, 15.0),
            entry(Symbol::Seven, 50.0),
        ])
    }

    /// Symbols missing from the table pay nothing.
    pub fn value_of(&self, symbol: Symbol) -> f64 {
        self.0
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.value)
            .unwrap_or(0.0)
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self::simple_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cherry_pays_double() {
        let table = Paytable::simple_default();
        assert_eq!(table.value_of(Symbol::Cherry), 2.0);
        assert_eq!(Paytable(vec![]).value_of(Symbol::Seven), 0.0);
    }
}
