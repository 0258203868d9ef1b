// ============================================================================
// Analytics : Performance mensuelle
// ============================================================================
// Variation journalière moyenne regroupée par mois calendaire (1 à 12),
// toutes années confondues. Les jours sans variation (première NAV) sont
// ignorés.
// ============================================================================

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::NavHistory;

/// Noms courts des mois pour l'affichage
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Variation moyenne d'un mois calendaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    /// Mois (1 = janvier)
    pub month: u32,
    pub average_day_change: f64,
    pub observations: usize,
}

impl MonthlyPerformance {
    pub fn label(&self) -> &'static str {
        month_label(self.month)
    }
}

pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_LABELS.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// Regroupe les variations journalières par mois
///
/// CONCEPT RUST : BTreeMap
/// - Map triée par clé : les mois sortent dans l'ordre 1..12
pub fn monthly_average_day_change(history: &NavHistory) -> Vec<MonthlyPerformance> {
    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

    for record in &history.records {
        if let Some(change) = record.day_change {
            let entry = buckets.entry(record.date.month()).or_insert((0.0, 0));
            entry.0 += change;
            entry.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(month, (sum, count))| MonthlyPerformance {
            month,
            average_day_change: sum / count as f64,
            observations: count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_grouping() {
        let raw = vec![
            ("30-01-2024", "100"),
            ("31-01-2024", "102"),
            ("01-02-2024", "101"),
            ("02-02-2024", "104"),
            ("01-01-2025", "110"),
        ];
        let history = NavHistory::from_raw("1".into(), "Test".into(), raw);
        let months = monthly_average_day_change(&history);

        // Janvier : +2 (2024) et +6 (2025) ; février : -1 et +3
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, 1);
        assert_eq!(months[0].observations, 2);
        assert!((months[0].average_day_change - 4.0).abs() < 1e-9);
        assert_eq!(months[1].label(), "Feb");
        assert!((months[1].average_day_change - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history() {
        let history = NavHistory::new("1".into(), "Test".into(), vec![]);
        assert!(monthly_average_day_change(&history).is_empty());
    }

    #[test]
    fn test_month_label_bounds() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(12), "Dec");
        assert_eq!(month_label(0), "?");
        assert_eq!(month_label(13), "?");
    }
}
