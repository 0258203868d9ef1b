// ============================================================================
// Worker : exécution des requêtes
// ============================================================================
// Une Query = un cycle "télécharger puis construire la vue".
// QueryRunner vit dans le thread worker (voir main.rs) et garde en cache
// la liste des fonds, ainsi que le dernier historique du mode risque :
// les curseurs de simulation relancent la même Query à chaque pression.
// ============================================================================

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::api::{
    fetch_average_aum, fetch_historical_nav, fetch_scheme_codes, fetch_scheme_details, FundClient,
};
use crate::app::Query;
use crate::models::{NavHistory, Scheme};
use crate::views::{
    build_average_aum, build_comparison, build_historical_nav, build_performance, build_risk,
    build_scheme_details, build_scheme_list, View,
};

/// Exécute les Query avec un client HTTP partagé
pub struct QueryRunner {
    client: FundClient,
    schemes: Vec<Scheme>,
    risk_history: Option<NavHistory>,
}

impl QueryRunner {
    pub fn new(client: FundClient) -> Self {
        Self {
            client,
            schemes: Vec::new(),
            risk_history: None,
        }
    }

    /// Télécharge la liste des fonds et la garde en cache
    pub async fn load_schemes(&mut self) -> Result<Vec<Scheme>> {
        self.schemes = fetch_scheme_codes(&self.client).await?;
        Ok(self.schemes.clone())
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    /// Télécharge les données d'une Query et construit sa vue
    #[instrument(skip(self))]
    pub async fn run(&mut self, query: &Query) -> Result<View> {
        let settings = self.client.settings();

        let view = match query {
            Query::SchemeList { amc } => {
                if self.schemes.is_empty() {
                    self.load_schemes().await?;
                }
                build_scheme_list(&self.schemes, amc)
            }

            Query::SchemeDetails { code } => {
                let details = fetch_scheme_details(&self.client, code).await?;
                build_scheme_details(details.as_ref())
            }

            Query::HistoricalNav { code } => {
                let history = fetch_historical_nav(&self.client, code).await?;
                build_historical_nav(&history)
            }

            Query::Compare { codes } => {
                // Moins de deux fonds : rien à télécharger
                let mut histories: Vec<NavHistory> = Vec::with_capacity(codes.len());
                if codes.len() >= 2 {
                    for code in codes {
                        histories.push(fetch_historical_nav(&self.client, code).await?);
                    }
                }
                build_comparison(&histories)
            }

            Query::AverageAum => {
                let records = fetch_average_aum(&self.client, &settings.aum_period).await?;
                build_average_aum(&settings.aum_period, &records)
            }

            Query::Performance { code } => {
                let history = fetch_historical_nav(&self.client, code).await?;
                build_performance(&history)
            }

            Query::Risk { code, params } => {
                let cached = self
                    .risk_history
                    .take()
                    .filter(|history| history.scheme_code == *code);
                let history = match cached {
                    Some(history) => {
                        debug!(%code, "Reusing cached NAV history");
                        history
                    }
                    None => fetch_historical_nav(&self.client, code).await?,
                };
                let view = build_risk(&history, params, settings.risk_free_rate);
                self.risk_history = Some(history);
                view
            }
        };

        info!(title = view.title(), placeholder = view.is_placeholder(), "View built");
        Ok(view)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
// Aucun de ces tests ne touche le réseau : les chemins testés s'arrêtent
// avant la première requête HTTP.
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::SimulationParams;
    use crate::config::Settings;
    use crate::models::NavRecord;
    use chrono::NaiveDate;

    fn runner() -> QueryRunner {
        QueryRunner::new(FundClient::new(Settings::default()).unwrap())
    }

    #[tokio::test]
    async fn test_compare_with_one_scheme_skips_fetch() {
        let mut runner = runner();
        let view = runner
            .run(&Query::Compare {
                codes: vec!["120828".to_string()],
            })
            .await
            .unwrap();

        match view {
            View::Placeholder { message, .. } => {
                assert_eq!(message, "Select at least 2 schemes to compare")
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scheme_list_uses_cache() {
        let mut runner = runner();
        runner.schemes = vec![
            Scheme::new("1", "Axis Bluechip Fund"),
            Scheme::new("2", "HDFC Top 100 Fund"),
        ];

        let view = runner
            .run(&Query::SchemeList {
                amc: "hdfc".to_string(),
            })
            .await
            .unwrap();

        match view {
            View::Table { table, .. } => assert_eq!(table.rows, vec![vec!["HDFC Top 100 Fund", "2"]]),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_risk_reuses_cached_history() {
        let mut runner = runner();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = (0..40)
            .map(|i| {
                let nav = 100.0 + i as f64 + if i % 2 == 0 { 0.5 } else { -0.5 };
                NavRecord::new(start + chrono::Duration::days(i), nav)
            })
            .collect();
        runner.risk_history = Some(NavHistory::new(
            "120828".to_string(),
            "Quant Small Cap Fund".to_string(),
            records,
        ));

        let params = SimulationParams {
            num_simulations: 100,
            num_days: 30,
            seed: Some(7),
        };
        let view = runner
            .run(&Query::Risk {
                code: "120828".to_string(),
                params,
            })
            .await
            .unwrap();

        assert!(!view.is_placeholder());
        assert!(runner.risk_history.is_some());
    }

    #[test]
    fn test_schemes_accessor_reflects_cache() {
        let mut runner = runner();
        assert!(runner.schemes().is_empty());
        runner.schemes = vec![Scheme::new("1", "Axis Bluechip Fund")];
        assert_eq!(runner.schemes().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_code_is_an_error() {
        let mut runner = runner();
        let result = runner
            .run(&Query::HistoricalNav {
                code: "abc".to_string(),
            })
            .await;
        assert!(result.is_err());
    }
}
