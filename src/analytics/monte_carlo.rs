// ============================================================================
// Analytics : Simulation Monte Carlo
// ============================================================================
// Projection naïve des NAV futures :
// - chaque trajectoire part de la dernière NAV connue
// - chaque jour : prix = prix_précédent × (1 + r), r ~ N(moyenne, écart-type)
// - moyenne et écart-type = statistiques des rendements journaliers passés
//
// Sortie : matrice complète des trajectoires (pour le graphique) et
// distribution des prix au dernier jour (moyenne, min, max, percentiles).
// ============================================================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Bornes et valeurs par défaut des curseurs de l'interface
pub const MIN_SIMULATIONS: usize = 100;
pub const MAX_SIMULATIONS: usize = 5000;
pub const DEFAULT_SIMULATIONS: usize = 1000;
pub const MIN_DAYS: usize = 30;
pub const MAX_DAYS: usize = 365;
pub const DEFAULT_DAYS: usize = 252;

/// Paramètres d'une simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Nombre de trajectoires indépendantes (>= 1)
    pub num_simulations: usize,

    /// Horizon en jours (0 = seulement le point de départ)
    pub num_days: usize,

    /// Graine pour la reproductibilité (None = aléatoire)
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_simulations: DEFAULT_SIMULATIONS,
            num_days: DEFAULT_DAYS,
            seed: None,
        }
    }
}

/// Distribution des prix au dernier jour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalPriceStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub percentile_5: f64,
    pub percentile_95: f64,
}

impl FinalPriceStats {
    /// Calcule les statistiques ; None si `prices` est vide
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }

        let mut sorted = prices.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: percentile(&sorted, 0.5),
            percentile_5: percentile(&sorted, 0.05),
            percentile_95: percentile(&sorted, 0.95),
        })
    }
}

/// Résultat complet d'une simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub start_price: f64,

    /// Une trajectoire par simulation, chacune de longueur num_days + 1
    pub paths: Vec<Vec<f64>>,

    pub final_stats: FinalPriceStats,
}

impl MonteCarloResult {
    /// Prix au dernier jour de chaque trajectoire
    pub fn final_prices(&self) -> Vec<f64> {
        self.paths.iter().filter_map(|p| p.last().copied()).collect()
    }
}

/// Lance la simulation avec le générateur adapté aux paramètres
///
/// - seed = Some(n) : StdRng déterministe
/// - seed = None : générateur du thread courant
pub fn simulate(
    start_price: f64,
    daily_mean: f64,
    daily_std: f64,
    params: &SimulationParams,
) -> AnalyticsResult<MonteCarloResult> {
    match params.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            simulate_with_rng(start_price, daily_mean, daily_std, params, &mut rng)
        }
        None => simulate_with_rng(start_price, daily_mean, daily_std, params, &mut rand::rng()),
    }
}

/// Simulation avec un générateur fourni par l'appelant
///
/// CONCEPT RUST : Générique sur le RNG
/// - `R: Rng + ?Sized` accepte StdRng, ThreadRng ou un &mut dyn RngCore
/// - Les tests passent un StdRng seedé pour des résultats reproductibles
pub fn simulate_with_rng<R: Rng + ?Sized>(
    start_price: f64,
    daily_mean: f64,
    daily_std: f64,
    params: &SimulationParams,
    rng: &mut R,
) -> AnalyticsResult<MonteCarloResult> {
    if params.num_simulations == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "au moins une simulation est requise".to_string(),
        ));
    }
    if !start_price.is_finite() || start_price <= 0.0 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "NAV de départ invalide : {}",
            start_price
        )));
    }
    if !daily_mean.is_finite() {
        return Err(AnalyticsError::InvalidParameter(format!(
            "rendement moyen invalide : {}",
            daily_mean
        )));
    }

    // rand_distr accepte un écart-type négatif (loi "retournée")
    if !daily_std.is_finite() || daily_std < 0.0 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "écart-type invalide : {}",
            daily_std
        )));
    }

    let normal = Normal::new(daily_mean, daily_std).map_err(|e| {
        AnalyticsError::InvalidParameter(format!("écart-type {} : {}", daily_std, e))
    })?;

    debug!(
        simulations = params.num_simulations,
        days = params.num_days,
        daily_mean,
        daily_std,
        "Running Monte Carlo simulation"
    );

    let paths: Vec<Vec<f64>> = (0..params.num_simulations)
        .map(|_| {
            let mut path = Vec::with_capacity(params.num_days + 1);
            let mut price = start_price;
            path.push(price);
            for _ in 0..params.num_days {
                price *= 1.0 + normal.sample(&mut *rng);
                path.push(price);
            }
            path
        })
        .collect();

    let finals: Vec<f64> = paths.iter().filter_map(|p| p.last().copied()).collect();
    let final_stats = FinalPriceStats::from_prices(&finals).ok_or(AnalyticsError::InsufficientData {
        required: 1,
        available: 0,
    })?;

    Ok(MonteCarloResult {
        start_price,
        paths,
        final_stats,
    })
}

/// Percentile par interpolation linéaire sur une série triée
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(num_simulations: usize, num_days: usize, seed: Option<u64>) -> SimulationParams {
        SimulationParams {
            num_simulations,
            num_days,
            seed,
        }
    }

    #[test]
    fn test_zero_days_returns_start_price() {
        let result = simulate(123.45, 0.001, 0.02, &params(1, 0, None)).unwrap();

        assert_eq!(result.paths, vec![vec![123.45]]);
        assert_eq!(result.final_stats.min, 123.45);
        assert_eq!(result.final_stats.max, 123.45);
        assert_eq!(result.final_stats.mean, 123.45);
    }

    #[test]
    fn test_path_shape() {
        let result = simulate(100.0, 0.0005, 0.01, &params(20, 30, Some(7))).unwrap();

        assert_eq!(result.paths.len(), 20);
        assert!(result.paths.iter().all(|p| p.len() == 31));
        assert!(result.paths.iter().all(|p| p[0] == 100.0));
        assert_eq!(result.final_prices().len(), 20);

        let stats = result.final_stats;
        assert!(stats.min <= stats.percentile_5);
        assert!(stats.percentile_5 <= stats.median);
        assert!(stats.median <= stats.percentile_95);
        assert!(stats.percentile_95 <= stats.max);
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = simulate(50.0, 0.001, 0.015, &params(10, 15, Some(42))).unwrap();
        let b = simulate(50.0, 0.001, 0.015, &params(10, 15, Some(42))).unwrap();
        assert_eq!(a, b);

        let c = simulate(50.0, 0.001, 0.015, &params(10, 15, Some(43))).unwrap();
        assert_ne!(a.paths, c.paths);
    }

    #[test]
    fn test_zero_std_is_deterministic() {
        let result = simulate(100.0, 0.01, 0.0, &params(3, 2, None)).unwrap();
        for path in &result.paths {
            assert!((path[2] - 102.01).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            simulate(100.0, 0.0, 0.01, &params(0, 10, None)),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        assert!(matches!(
            simulate(0.0, 0.0, 0.01, &params(1, 10, None)),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        assert!(matches!(
            simulate(100.0, 0.0, -0.01, &params(1, 10, None)),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_negative_std_rejected_even_when_seeded() {
        assert!(matches!(
            simulate(100.0, 0.0, -0.01, &params(2, 3, Some(1))),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        assert!(matches!(
            simulate(100.0, 0.0, f64::NAN, &params(2, 3, Some(1))),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_final_price_stats() {
        let stats = FinalPriceStats::from_prices(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert!((stats.percentile_5 - 1.2).abs() < 1e-12);
        assert!((stats.percentile_95 - 4.8).abs() < 1e-12);

        assert!(FinalPriceStats::from_prices(&[]).is_none());
    }
}
