// ============================================================================
// Structure : AumRecord
// ============================================================================
// Encours moyen (Average AUM) d'une société de gestion sur un trimestre
// Montants en lakhs de roupies, tels que publiés par l'AMFI
// ============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AumRecord {
    pub fund_name: String,
    pub aaum_domestic: f64,
    pub aaum_overseas: f64,
}

impl AumRecord {
    pub fn new(fund_name: impl Into<String>, aaum_domestic: f64, aaum_overseas: f64) -> Self {
        Self {
            fund_name: fund_name.into(),
            aaum_domestic,
            aaum_overseas,
        }
    }

    /// AUM total = domestique + étranger
    pub fn total(&self) -> f64 {
        self.aaum_domestic + self.aaum_overseas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        let record = AumRecord::new("Quant Mutual Fund", 9_000.5, 500.25);
        assert_eq!(record.total(), 9_500.75);
    }
}
