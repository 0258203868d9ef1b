// ============================================================================
// Analytics : Risque et rendement
// ============================================================================
// Statistiques descriptives sur une série de NAV chronologique :
// - rendements journaliers simples : nav[i] / nav[i-1] - 1
// - volatilité annualisée : écart-type (échantillon, n-1) × sqrt(252)
// - rendement annualisé : (1 + moyenne)^252 - 1
// - ratio de Sharpe : (rendement annualisé - taux sans risque) / volatilité
//
// Toutes les fonctions sont pures : mêmes entrées, mêmes sorties.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Nombre de jours de cotation par an
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Calcule les rendements journaliers simples
///
/// Le premier rendement (indéfini) n'est pas retourné : la sortie contient
/// `navs.len() - 1` valeurs.
pub fn daily_returns(navs: &[f64]) -> AnalyticsResult<Vec<f64>> {
    if navs.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            available: navs.len(),
        });
    }

    if let Some(bad) = navs.iter().find(|v| !v.is_finite() || **v <= 0.0) {
        return Err(AnalyticsError::InvalidParameter(format!(
            "NAV non positive : {}",
            bad
        )));
    }

    Ok(navs.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
}

/// Moyenne arithmétique
pub fn mean(values: &[f64]) -> AnalyticsResult<f64> {
    if values.is_empty() {
        return Err(AnalyticsError::InsufficientData {
            required: 1,
            available: 0,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Écart-type d'échantillon (dénominateur n - 1)
pub fn sample_std(values: &[f64]) -> AnalyticsResult<f64> {
    if values.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            available: values.len(),
        });
    }
    let m = mean(values)?;
    let var = values.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (values.len() - 1) as f64;
    Ok(var.sqrt())
}

/// Volatilité annualisée
pub fn annualized_volatility(returns: &[f64]) -> AnalyticsResult<f64> {
    Ok(sample_std(returns)? * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Rendement annualisé composé
pub fn annualized_return(returns: &[f64]) -> AnalyticsResult<f64> {
    Ok((1.0 + mean(returns)?).powf(TRADING_DAYS_PER_YEAR) - 1.0)
}

/// Ratio de Sharpe
///
/// Retourne `ZeroVolatility` au lieu de diviser par zéro.
pub fn sharpe_ratio(
    annualized_return: f64,
    annualized_volatility: f64,
    risk_free_rate: f64,
) -> AnalyticsResult<f64> {
    if !annualized_volatility.is_finite() || annualized_volatility.abs() < f64::EPSILON {
        return Err(AnalyticsError::ZeroVolatility);
    }
    Ok((annualized_return - risk_free_rate) / annualized_volatility)
}

/// Résumé des statistiques de risque d'un fonds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub annualized_volatility: f64,
    pub annualized_return: f64,

    /// None quand la volatilité est nulle
    pub sharpe_ratio: Option<f64>,

    /// Paramètres journaliers, réutilisés par la simulation Monte Carlo
    pub daily_mean: f64,
    pub daily_std: f64,

    pub observations: usize,
}

impl RiskMetrics {
    /// Calcule toutes les métriques à partir des NAV
    pub fn from_navs(navs: &[f64], risk_free_rate: f64) -> AnalyticsResult<Self> {
        let returns = daily_returns(navs)?;
        Self::from_returns(&returns, risk_free_rate)
    }

    /// Calcule toutes les métriques à partir des rendements journaliers
    pub fn from_returns(returns: &[f64], risk_free_rate: f64) -> AnalyticsResult<Self> {
        let daily_mean = mean(returns)?;
        let daily_std = sample_std(returns)?;
        let annualized_volatility = annualized_volatility(returns)?;
        let annualized_return = annualized_return(returns)?;

        // Volatilité nulle : on garde les autres métriques, Sharpe = N/A
        let sharpe_ratio = match sharpe_ratio(annualized_return, annualized_volatility, risk_free_rate) {
            Ok(value) => Some(value),
            Err(AnalyticsError::ZeroVolatility) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            annualized_volatility,
            annualized_return,
            sharpe_ratio,
            daily_mean,
            daily_std,
            observations: returns.len(),
        })
    }
}
