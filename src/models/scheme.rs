// ============================================================================
// Structures : Scheme et SchemeDetails
// ============================================================================
// Un "scheme" est un fonds commun de placement (mutual fund) identifié par
// son code AMFI. La liste complète vient du fichier NAVAll.txt, le détail
// vient de api.mfapi.in.
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Un fonds tel qu'il apparaît dans la liste AMFI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    /// Code AMFI (ex: "119551")
    pub code: String,

    /// Nom complet (ex: "Aditya Birla Sun Life Banking & PSU Debt Fund - DIRECT - IDCW")
    pub name: String,

    /// Société de gestion (en-tête de bloc dans NAVAll.txt)
    pub fund_house: Option<String>,

    /// Catégorie (ex: "Debt Scheme - Banking and PSU Fund")
    pub category: Option<String>,

    /// Dernière NAV publiée, si numérique
    pub latest_nav: Option<f64>,

    /// Date de la dernière NAV
    pub nav_date: Option<NaiveDate>,
}

impl Scheme {
    /// Crée un fonds sans métadonnées
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            fund_house: None,
            category: None,
            latest_nav: None,
            nav_date: None,
        }
    }

    /// Vérifie si le nom contient `query` (insensible à la casse)
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        !query.is_empty() && self.name.to_lowercase().contains(&query)
    }

    /// Libellé court pour les listes : nom tronqué à `max` caractères
    pub fn short_name(&self, max: usize) -> String {
        if self.name.chars().count() <= max {
            self.name.clone()
        } else {
            let truncated: String = self.name.chars().take(max.saturating_sub(1)).collect();
            format!("{}…", truncated)
        }
    }
}

/// Détail d'un fonds (api.mfapi.in)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeDetails {
    pub fund_house: String,
    pub scheme_type: String,
    pub scheme_category: String,
    pub scheme_code: String,
    pub scheme_name: String,

    /// Date de la première NAV connue
    pub start_date: Option<NaiveDate>,

    /// Première NAV connue
    pub start_nav: Option<f64>,
}

impl SchemeDetails {
    /// Paires (libellé, valeur) pour l'affichage en tableau
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Fund House", self.fund_house.clone()),
            ("Scheme Type", self.scheme_type.clone()),
            ("Scheme Category", self.scheme_category.clone()),
            ("Scheme Code", self.scheme_code.clone()),
            ("Scheme Name", self.scheme_name.clone()),
            (
                "Start Date",
                self.start_date
                    .map(|d| d.format("%d-%m-%Y").to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Start NAV",
                self.start_nav
                    .map(|nav| format!("{:.4}", nav))
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_case_insensitive() {
        let scheme = Scheme::new("119551", "Aditya Birla Sun Life Banking & PSU Debt Fund");
        assert!(scheme.matches("aditya birla"));
        assert!(scheme.matches("  PSU "));
        assert!(!scheme.matches("HDFC"));
        assert!(!scheme.matches(""));
    }

    #[test]
    fn test_short_name() {
        let scheme = Scheme::new("1", "Quant Small Cap Fund - Growth");
        assert_eq!(scheme.short_name(100), "Quant Small Cap Fund - Growth");
        assert_eq!(scheme.short_name(10), "Quant Sma…");
    }

    #[test]
    fn test_details_fields() {
        let details = SchemeDetails {
            fund_house: "Quant Mutual Fund".to_string(),
            scheme_type: "Open Ended Schemes".to_string(),
            scheme_category: "Equity Scheme - Small Cap Fund".to_string(),
            scheme_code: "120828".to_string(),
            scheme_name: "quant Small Cap Fund - Growth Option - Direct Plan".to_string(),
            start_date: NaiveDate::from_ymd_opt(2013, 1, 2),
            start_nav: None,
        };

        let fields = details.fields();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[3], ("Scheme Code", "120828".to_string()));
        assert_eq!(fields[5].1, "02-01-2013");
        assert_eq!(fields[6].1, "N/A");
    }
}
