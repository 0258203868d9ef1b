// ============================================================================
// Module : views
// ============================================================================
// Structures "prêtes à afficher", indépendantes de ratatui.
//
// CONCEPT : Séparation données / rendu
// - Les fonctions build_* (build.rs) reçoivent des paramètres explicites
//   (mode, fonds, période, paramètres de simulation) et retournent une View
// - Le module ui ne fait que dessiner une View, sans calcul
// - Les vues sont donc testables sans terminal
// ============================================================================

pub mod build;

use serde::{Deserialize, Serialize};

use crate::analytics::{MonteCarloResult, SimulationParams};

pub use build::{
    build_average_aum, build_comparison, build_historical_nav, build_performance, build_risk,
    build_scheme_details, build_scheme_list, MAX_PLOTTED_PATHS,
};

// ============================================================================
// Enum : Mode
// ============================================================================

/// Les sept modes du menu de sélection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    ViewAllSchemes,
    SchemeDetails,
    HistoricalNav,
    CompareNavs,
    AverageAum,
    SchemePerformance,
    RiskVolatility,
}

impl Mode {
    /// Tous les modes, dans l'ordre du menu
    pub const ALL: [Mode; 7] = [
        Mode::ViewAllSchemes,
        Mode::SchemeDetails,
        Mode::HistoricalNav,
        Mode::CompareNavs,
        Mode::AverageAum,
        Mode::SchemePerformance,
        Mode::RiskVolatility,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Mode::ViewAllSchemes => "View All Schemes",
            Mode::SchemeDetails => "Scheme Details",
            Mode::HistoricalNav => "Historical NAV",
            Mode::CompareNavs => "Compare NAVs",
            Mode::AverageAum => "Average AUM",
            Mode::SchemePerformance => "Scheme Performance",
            Mode::RiskVolatility => "Risk & Volatility",
        }
    }

    /// Le mode demande-t-il de choisir un fonds dans la liste ?
    pub fn needs_scheme(&self) -> bool {
        matches!(
            self,
            Mode::SchemeDetails
                | Mode::HistoricalNav
                | Mode::CompareNavs
                | Mode::SchemePerformance
                | Mode::RiskVolatility
        )
    }

    /// Sélection multiple (comparaison)
    pub fn is_multi_select(&self) -> bool {
        matches!(self, Mode::CompareNavs)
    }

    /// Saisie du nom de société (AMC)
    pub fn needs_amc(&self) -> bool {
        matches!(self, Mode::ViewAllSchemes)
    }

    /// Curseurs de simulation
    pub fn has_simulation(&self) -> bool {
        matches!(self, Mode::RiskVolatility)
    }

    /// Position dans le menu
    pub fn index(&self) -> usize {
        Mode::ALL.iter().position(|m| m == self).unwrap_or(0)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::ViewAllSchemes
    }
}

// ============================================================================
// Briques d'affichage
// ============================================================================

/// Tableau de texte
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Une courbe : points (x, y) déjà triés par x
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Graphique ligne avec bornes et labels précalculés
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<Series>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

/// Une valeur affichée en "carte"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Une barre (performance mensuelle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// Contenu du mode Risk & Volatility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskView {
    pub title: String,
    pub metrics: Vec<Metric>,
    pub returns_chart: LineChart,
    pub simulation_chart: LineChart,
    pub simulation_stats: Vec<Metric>,
    pub params: SimulationParams,
    pub simulation: MonteCarloResult,
}

// ============================================================================
// Enum : View
// ============================================================================

/// Ce que le panneau principal doit afficher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum View {
    /// Message à la place des données ("No data found", ...)
    Placeholder { title: String, message: String },

    /// Liste des fonds, détail d'un fonds, AUM moyens
    Table { title: String, table: Table },

    /// Historique : tableau + graphique
    History {
        title: String,
        table: Table,
        chart: LineChart,
    },

    /// Comparaison de plusieurs fonds
    Comparison { chart: LineChart },

    /// Variation moyenne par mois
    Performance {
        title: String,
        bars: Vec<Bar>,
        table: Table,
    },

    /// Métriques de risque + Monte Carlo
    Risk(Box<RiskView>),
}

impl View {
    pub fn placeholder(title: impl Into<String>, message: impl Into<String>) -> Self {
        View::Placeholder {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Titre du panneau
    pub fn title(&self) -> &str {
        match self {
            View::Placeholder { title, .. }
            | View::Table { title, .. }
            | View::History { title, .. }
            | View::Performance { title, .. } => title,
            View::Comparison { chart } => &chart.title,
            View::Risk(risk) => &risk.title,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, View::Placeholder { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_flags() {
        assert!(Mode::ViewAllSchemes.needs_amc());
        assert!(!Mode::ViewAllSchemes.needs_scheme());
        assert!(!Mode::AverageAum.needs_scheme());
        assert!(Mode::CompareNavs.is_multi_select());
        assert!(Mode::RiskVolatility.has_simulation());
        assert!(Mode::RiskVolatility.needs_scheme());
    }

    #[test]
    fn test_mode_index_matches_menu_order() {
        for (i, mode) in Mode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
        assert_eq!(Mode::default(), Mode::ViewAllSchemes);
    }

    #[test]
    fn test_view_title() {
        let view = View::placeholder("Average AUM", "No data found");
        assert_eq!(view.title(), "Average AUM");
        assert!(view.is_placeholder());
    }
}
