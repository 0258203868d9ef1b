// ============================================================================
// Module : analytics
// ============================================================================
// Le seul vrai calcul de l'application : risque, rendement, Monte Carlo
// ============================================================================

pub mod monte_carlo; // Projection des NAV futures
pub mod performance; // Variation moyenne par mois
pub mod risk;        // Volatilité, rendement, Sharpe

pub use monte_carlo::{simulate, FinalPriceStats, MonteCarloResult, SimulationParams};
pub use performance::{monthly_average_day_change, MonthlyPerformance};
pub use risk::{daily_returns, RiskMetrics};
