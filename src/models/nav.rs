// ============================================================================
// Structures : NavRecord et NavHistory
// ============================================================================
// Historique des valeurs liquidatives (NAV) d'un fonds
//
// Nettoyage appliqué à la construction :
// - NAV non numérique ou date illisible : ligne ignorée
// - Tri par date croissante (l'API renvoie du plus récent au plus ancien)
// - day_change = nav - nav de la veille (None pour la plus ancienne)
//
// Nettoyage optionnel : interpolate_zeros() remplace les NAV nulles
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Format des dates de api.mfapi.in (ex: "16-10-2024")
pub const NAV_DATE_FORMAT: &str = "%d-%m-%Y";

/// Une NAV à une date donnée
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavRecord {
    pub date: NaiveDate,
    pub nav: f64,

    /// Variation absolue depuis la NAV précédente
    pub day_change: Option<f64>,
}

impl NavRecord {
    pub fn new(date: NaiveDate, nav: f64) -> Self {
        Self {
            date,
            nav,
            day_change: None,
        }
    }
}

/// Historique complet d'un fonds, trié par date croissante
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavHistory {
    pub scheme_code: String,
    pub scheme_name: String,
    pub records: Vec<NavRecord>,
}

impl NavHistory {
    /// Construit un historique à partir de NAV déjà typées
    ///
    /// Les enregistrements sont triés et les variations recalculées.
    pub fn new(scheme_code: String, scheme_name: String, mut records: Vec<NavRecord>) -> Self {
        records.retain(|r| r.nav.is_finite());
        records.sort_by_key(|r| r.date);
        let mut history = Self {
            scheme_code,
            scheme_name,
            records,
        };
        history.recompute_day_changes();
        history
    }

    /// Construit un historique à partir des chaînes brutes (date, nav)
    ///
    /// CONCEPT RUST : IntoIterator générique
    /// - Accepte Vec<(String, String)>, un iterator de tuples, etc.
    /// - Les lignes illisibles sont ignorées (filter_map)
    pub fn from_raw<I, D, N>(scheme_code: String, scheme_name: String, raw: I) -> Self
    where
        I: IntoIterator<Item = (D, N)>,
        D: AsRef<str>,
        N: AsRef<str>,
    {
        let mut dropped = 0usize;
        let records: Vec<NavRecord> = raw
            .into_iter()
            .filter_map(|(date, nav)| {
                let parsed = parse_nav_date(date.as_ref()).zip(parse_nav_value(nav.as_ref()));
                if parsed.is_none() {
                    dropped += 1;
                }
                parsed.map(|(date, nav)| NavRecord::new(date, nav))
            })
            .collect();

        if dropped > 0 {
            debug!(scheme = %scheme_code, dropped, "Dropped non-numeric NAV rows");
        }

        Self::new(scheme_code, scheme_name, records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// NAV la plus récente
    pub fn last(&self) -> Option<&NavRecord> {
        self.records.last()
    }

    /// NAV la plus ancienne
    pub fn first(&self) -> Option<&NavRecord> {
        self.records.first()
    }

    /// Les valeurs seules, dans l'ordre chronologique
    pub fn navs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.nav).collect()
    }

    /// Copie de l'historique où les NAV nulles sont interpolées
    ///
    /// Les zéros en tête (sans voisin à gauche) sont supprimés.
    pub fn interpolate_zeros(&self) -> NavHistory {
        let filled = interpolate_zeros(&self.navs());
        let records = self
            .records
            .iter()
            .zip(filled)
            .filter_map(|(record, nav)| nav.map(|nav| NavRecord::new(record.date, nav)))
            .collect();

        NavHistory::new(self.scheme_code.clone(), self.scheme_name.clone(), records)
    }

    fn recompute_day_changes(&mut self) {
        let mut previous: Option<f64> = None;
        for record in &mut self.records {
            record.day_change = previous.map(|prev| record.nav - prev);
            previous = Some(record.nav);
        }
    }
}

/// Parse une date au format dd-mm-YYYY
pub fn parse_nav_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), NAV_DATE_FORMAT).ok()
}

/// Parse une NAV ; None si non numérique ("N.A.", "-", vide...)
pub fn parse_nav_value(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Remplace chaque zéro par une interpolation linéaire entre voisins non nuls
///
/// - zéro entre deux valeurs : interpolation selon la position
/// - zéros en fin de série : dernière valeur non nulle
/// - zéros en début de série : None (pas de voisin à gauche)
pub fn interpolate_zeros(values: &[f64]) -> Vec<Option<f64>> {
    let mut out: Vec<Option<f64>> = values
        .iter()
        .map(|&v| if v == 0.0 { None } else { Some(v) })
        .collect();

    let mut last_known: Option<usize> = None;
    let mut i = 0;
    while i < out.len() {
        if out[i].is_some() {
            last_known = Some(i);
            i += 1;
            continue;
        }

        // Début d'un trou : cherche la prochaine valeur connue
        let gap_start = i;
        let mut gap_end = i;
        while gap_end < out.len() && out[gap_end].is_none() {
            gap_end += 1;
        }

        if let Some(left) = last_known {
            let left_value = values[left];
            for (j, slot) in out.iter_mut().enumerate().take(gap_end).skip(gap_start) {
                *slot = Some(match values.get(gap_end) {
                    Some(&right_value) => {
                        left_value
                            + (right_value - left_value) * (j - left) as f64
                                / (gap_end - left) as f64
                    }
                    None => left_value,
                });
            }
        }

        i = gap_end;
    }

    out
}
