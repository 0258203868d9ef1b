// ============================================================================
// Erreurs du moteur de calcul
// ============================================================================
// Les appels API utilisent anyhow (erreurs applicatives avec contexte).
// Les calculs numériques ont leurs propres erreurs typées : l'appelant doit
// pouvoir distinguer "pas assez d'historique" de "volatilité nulle".
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] implémente std::error::Error automatiquement
// - #[error("...")] génère l'implémentation de Display
// ============================================================================

use thiserror::Error;

/// Erreurs des fonctions de `analytics`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Pas assez de points pour calculer la statistique demandée
    #[error("données insuffisantes : {required} points requis, {available} disponibles")]
    InsufficientData { required: usize, available: usize },

    /// Volatilité annualisée nulle : le ratio de Sharpe n'est pas défini
    #[error("volatilité nulle : ratio de Sharpe indéfini")]
    ZeroVolatility,

    /// Paramètre hors domaine (nombre de simulations, écart-type négatif...)
    #[error("paramètre invalide : {0}")]
    InvalidParameter(String),
}

/// Alias pratique pour les résultats du moteur de calcul
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
