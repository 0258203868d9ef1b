// ============================================================================
// Construction des vues
// ============================================================================
// Une fonction par mode. Chaque fonction est pure : elle reçoit les données
// déjà téléchargées et les paramètres choisis dans l'interface, et retourne
// une View. Les cas "pas de données" deviennent des View::Placeholder.
// ============================================================================

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::analytics::{
    daily_returns, monthly_average_day_change, simulate, RiskMetrics, SimulationParams,
};
use crate::api::available_schemes;
use crate::models::{AumRecord, NavHistory, Scheme, SchemeDetails};
use crate::views::{Bar, LineChart, Metric, RiskView, Series, Table, View};

/// Nombre maximum de trajectoires dessinées (le terminal ne suit pas au-delà)
pub const MAX_PLOTTED_PATHS: usize = 50;

const NO_DATA: &str = "No data found";
const NO_SCHEME_DATA: &str = "No data found for the selected scheme";

// ============================================================================
// Mode 1 : View All Schemes
// ============================================================================

/// Fonds dont le nom contient `amc`
pub fn build_scheme_list(schemes: &[Scheme], amc: &str) -> View {
    let title = "All Mutual Fund Schemes";

    if amc.trim().is_empty() {
        return View::placeholder(title, "Enter an AMC name to list its schemes");
    }

    let matches = available_schemes(schemes, amc);
    if matches.is_empty() {
        return View::placeholder(title, "No schemes found");
    }

    let mut table = Table::new(&["Scheme Name", "Scheme Code"]);
    for scheme in matches {
        table.push(vec![scheme.name.clone(), scheme.code.clone()]);
    }

    debug!(amc, rows = table.len(), "Built scheme list view");
    View::Table {
        title: format!("{} ({} matching \"{}\")", title, table.len(), amc.trim()),
        table,
    }
}

// ============================================================================
// Mode 2 : Scheme Details
// ============================================================================

pub fn build_scheme_details(details: Option<&SchemeDetails>) -> View {
    let Some(details) = details else {
        return View::placeholder("Scheme Details", NO_DATA);
    };

    let mut table = Table::new(&["Field", "Value"]);
    for (label, value) in details.fields() {
        table.push(vec![label.to_string(), value]);
    }

    View::Table {
        title: format!("Scheme Details: {}", details.scheme_name),
        table,
    }
}

// ============================================================================
// Mode 3 : Historical NAV
// ============================================================================

/// Tableau (plus récent en haut) + courbe des NAV
pub fn build_historical_nav(history: &NavHistory) -> View {
    if history.is_empty() {
        return View::placeholder("Historical NAV", NO_SCHEME_DATA);
    }

    let mut table = Table::new(&["Date", "NAV", "Day Change"]);
    for record in history.records.iter().rev() {
        table.push(vec![
            record.date.format("%d-%m-%Y").to_string(),
            format!("{:.4}", record.nav),
            record
                .day_change
                .map(|c| format!("{:+.4}", c))
                .unwrap_or_default(),
        ]);
    }

    let series = Series {
        name: history.scheme_name.clone(),
        points: history
            .records
            .iter()
            .map(|r| (date_x(r.date), r.nav))
            .collect(),
    };

    let title = format!("Historical NAV: {}", history.scheme_name);
    let chart = date_chart(title.clone(), "NAV", vec![series]);

    View::History { title, table, chart }
}

// ============================================================================
// Mode 4 : Compare NAVs
// ============================================================================

/// Une courbe par fonds, NAV nulles interpolées
pub fn build_comparison(histories: &[NavHistory]) -> View {
    if histories.len() < 2 {
        return View::placeholder("Compare NAVs", "Select at least 2 schemes to compare");
    }

    let series: Vec<Series> = histories
        .iter()
        .map(|history| {
            let cleaned = history.interpolate_zeros();
            Series {
                name: history.scheme_name.clone(),
                points: cleaned
                    .records
                    .iter()
                    .map(|r| (date_x(r.date), r.nav))
                    .collect(),
            }
        })
        .filter(|s| !s.points.is_empty())
        .collect();

    if series.is_empty() {
        return View::placeholder("Compare NAVs", NO_DATA);
    }
    if series.len() < histories.len() {
        warn!(
            requested = histories.len(),
            plotted = series.len(),
            "Some schemes had no NAV data"
        );
    }

    View::Comparison {
        chart: date_chart("NAV Comparison".to_string(), "NAV", series),
    }
}

// ============================================================================
// Mode 5 : Average AUM
// ============================================================================

pub fn build_average_aum(period: &str, records: &[AumRecord]) -> View {
    let title = format!("Average AUM ({})", period);
    if records.is_empty() {
        return View::placeholder(title, NO_DATA);
    }

    let mut table = Table::new(&["Fund Name", "Total AUM"]);
    for record in records {
        table.push(vec![record.fund_name.clone(), format!("{:.2}", record.total())]);
    }

    View::Table { title, table }
}

// ============================================================================
// Mode 6 : Scheme Performance
// ============================================================================

/// Variation journalière moyenne par mois calendaire
pub fn build_performance(history: &NavHistory) -> View {
    let months = monthly_average_day_change(history);
    if months.is_empty() {
        return View::placeholder("Scheme Performance", NO_SCHEME_DATA);
    }

    let mut table = Table::new(&["Month", "Average Daily Change", "Days"]);
    let bars = months
        .iter()
        .map(|m| {
            table.push(vec![
                m.label().to_string(),
                format!("{:+.4}", m.average_day_change),
                m.observations.to_string(),
            ]);
            Bar {
                label: m.label().to_string(),
                value: m.average_day_change,
            }
        })
        .collect();

    View::Performance {
        title: format!("NAV performance of {}", history.scheme_name),
        bars,
        table,
    }
}

// ============================================================================
// Mode 7 : Risk & Volatility
// ============================================================================

/// Métriques de risque + simulation Monte Carlo à partir de la dernière NAV
pub fn build_risk(history: &NavHistory, params: &SimulationParams, risk_free_rate: f64) -> View {
    let cleaned = history.interpolate_zeros();
    if cleaned.is_empty() {
        return View::placeholder("Risk & Volatility", NO_SCHEME_DATA);
    }

    let navs = cleaned.navs();
    let metrics = match RiskMetrics::from_navs(&navs, risk_free_rate) {
        Ok(metrics) => metrics,
        Err(e) => {
            warn!(scheme = %history.scheme_code, error = %e, "Cannot compute risk metrics");
            return View::placeholder("Risk & Volatility", format!("Cannot compute metrics: {}", e));
        }
    };

    // from_navs a réussi : au moins 3 NAV, toutes positives
    let returns = daily_returns(&navs).unwrap_or_default();
    let last_nav = navs[navs.len() - 1];

    let simulation = match simulate(last_nav, metrics.daily_mean, metrics.daily_std, params) {
        Ok(result) => result,
        Err(e) => {
            warn!(scheme = %history.scheme_code, error = %e, "Simulation failed");
            return View::placeholder("Risk & Volatility", format!("Simulation failed: {}", e));
        }
    };

    let name = &history.scheme_name;

    let returns_chart = date_chart(
        format!("Daily returns of {}", name),
        "Return",
        vec![Series {
            name: "Daily Returns".to_string(),
            points: cleaned.records[1..]
                .iter()
                .zip(&returns)
                .map(|(r, &ret)| (date_x(r.date), ret))
                .collect(),
        }],
    );

    let simulation_chart = simulation_chart(
        format!("Monte Carlo projection of {}", name),
        &simulation.paths,
        params.num_days,
    );

    let stats = &simulation.final_stats;
    let metric_cards = vec![
        Metric::new("Annualised Volatility", format_percent(metrics.annualized_volatility)),
        Metric::new("Annualised Return", format_percent(metrics.annualized_return)),
        Metric::new(
            "Sharpe Ratio",
            metrics
                .sharpe_ratio
                .map(|s| format!("{:.2}", s))
                .unwrap_or_else(|| "N/A (zero volatility)".to_string()),
        ),
        Metric::new("Last NAV", format!("{:.4}", last_nav)),
        Metric::new("Observations", metrics.observations.to_string()),
    ];
    let simulation_stats = vec![
        Metric::new("Expected Final NAV", format!("{:.2}", stats.mean)),
        Metric::new("Minimum Final NAV", format!("{:.2}", stats.min)),
        Metric::new("Maximum Final NAV", format!("{:.2}", stats.max)),
        Metric::new("Median Final NAV", format!("{:.2}", stats.median)),
        Metric::new("5th Percentile", format!("{:.2}", stats.percentile_5)),
        Metric::new("95th Percentile", format!("{:.2}", stats.percentile_95)),
    ];

    View::Risk(Box::new(RiskView {
        title: format!("Metrics for {}", name),
        metrics: metric_cards,
        returns_chart,
        simulation_chart,
        simulation_stats,
        params: *params,
        simulation,
    }))
}

// ============================================================================
// Helpers graphiques
// ============================================================================

/// Abscisse d'une date : nombre de jours depuis l'an 1
fn date_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Graphique dont l'axe X est une date
fn date_chart(title: String, y_title: &str, series: Vec<Series>) -> LineChart {
    let x_bounds = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)), 0.0);
    let y_bounds = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)), 0.05);

    let x_labels = [x_bounds[0], (x_bounds[0] + x_bounds[1]) / 2.0, x_bounds[1]]
        .iter()
        .map(|&x| {
            x_to_date(x)
                .map(|d| d.format("%d-%m-%Y").to_string())
                .unwrap_or_default()
        })
        .collect();

    LineChart {
        title,
        x_title: "Date".to_string(),
        y_title: y_title.to_string(),
        series,
        x_bounds,
        y_labels: y_labels(y_bounds),
        y_bounds,
        x_labels,
    }
}

/// Graphique des trajectoires simulées (axe X = jour)
fn simulation_chart(title: String, paths: &[Vec<f64>], num_days: usize) -> LineChart {
    let series: Vec<Series> = paths
        .iter()
        .take(MAX_PLOTTED_PATHS)
        .enumerate()
        .map(|(i, path)| Series {
            name: format!("Simulation {}", i + 1),
            points: path
                .iter()
                .enumerate()
                .map(|(day, &price)| (day as f64, price))
                .collect(),
        })
        .collect();

    let y_bounds = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)), 0.05);
    let last_day = num_days.max(1) as f64;

    LineChart {
        title,
        x_title: "Day".to_string(),
        y_title: "Projected NAV".to_string(),
        series,
        x_bounds: [0.0, last_day],
        y_labels: y_labels(y_bounds),
        y_bounds,
        x_labels: vec![
            "0".to_string(),
            format!("{}", num_days / 2),
            format!("{}", num_days),
        ],
    }
}

/// Bornes [min, max] avec une marge relative ; jamais un intervalle vide
fn bounds(values: impl Iterator<Item = f64>, margin: f64) -> [f64; 2] {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min > max {
        return [0.0, 1.0];
    }

    let pad = if max > min {
        (max - min) * margin
    } else {
        max.abs().max(1.0) * 0.01
    };
    [min - pad, max + pad]
}

fn y_labels(bounds: [f64; 2]) -> Vec<String> {
    let [lo, hi] = bounds;
    let precision = if hi - lo < 1.0 { 4 } else { 2 };
    [lo, (lo + hi) / 2.0, hi]
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect()
}

fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn history(code: &str, name: &str, raw: &[(&str, &str)]) -> NavHistory {
        NavHistory::from_raw(code.to_string(), name.to_string(), raw.iter().copied())
    }

    fn sample_history() -> NavHistory {
        history(
            "120828",
            "Small Cap Fund",
            &[
                ("01-01-2024", "100"),
                ("02-01-2024", "101"),
                ("03-01-2024", "99"),
                ("04-01-2024", "102"),
                ("01-02-2024", "103"),
            ],
        )
    }

    #[test]
    fn test_scheme_list() {
        let schemes = vec![
            Scheme::new("1", "Axis Bluechip Fund"),
            Scheme::new("2", "HDFC Top 100 Fund"),
            Scheme::new("3", "Axis Small Cap Fund"),
        ];

        match build_scheme_list(&schemes, "axis") {
            View::Table { table, .. } => {
                assert_eq!(table.headers, vec!["Scheme Name", "Scheme Code"]);
                assert_eq!(table.len(), 2);
                assert_eq!(table.rows[1], vec!["Axis Small Cap Fund", "3"]);
            }
            other => panic!("unexpected view: {:?}", other),
        }

        match build_scheme_list(&schemes, "sbi") {
            View::Placeholder { message, .. } => assert_eq!(message, "No schemes found"),
            other => panic!("unexpected view: {:?}", other),
        }

        assert!(build_scheme_list(&schemes, "  ").is_placeholder());
    }

    #[test]
    fn test_scheme_details() {
        assert!(build_scheme_details(None).is_placeholder());

        let details = SchemeDetails {
            fund_house: "Axis Mutual Fund".into(),
            scheme_type: "Open Ended Schemes".into(),
            scheme_category: "Equity Scheme - Large Cap Fund".into(),
            scheme_code: "120465".into(),
            scheme_name: "Axis Bluechip Fund".into(),
            start_date: None,
            start_nav: None,
        };
        match build_scheme_details(Some(&details)) {
            View::Table { title, table } => {
                assert_eq!(title, "Scheme Details: Axis Bluechip Fund");
                assert_eq!(table.len(), 7);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_historical_nav() {
        match build_historical_nav(&sample_history()) {
            View::History { table, chart, .. } => {
                // Plus récent en premier dans le tableau
                assert_eq!(table.rows[0][0], "01-02-2024");
                assert_eq!(table.rows[0][2], "+1.0000");
                assert_eq!(table.rows[4][2], "");

                assert_eq!(chart.series.len(), 1);
                assert_eq!(chart.series[0].points.len(), 5);
                assert_eq!(chart.x_labels[0], "01-01-2024");
                assert_eq!(chart.x_labels[2], "01-02-2024");
                assert!(chart.y_bounds[0] < 99.0 && chart.y_bounds[1] > 103.0);
            }
            other => panic!("unexpected view: {:?}", other),
        }

        let empty = NavHistory::new("1".into(), "Empty".into(), vec![]);
        assert!(build_historical_nav(&empty).is_placeholder());
    }

    #[test]
    fn test_comparison_needs_two_schemes() {
        let view = build_comparison(&[sample_history()]);
        match view {
            View::Placeholder { message, .. } => {
                assert_eq!(message, "Select at least 2 schemes to compare")
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_comparison_interpolates_zeros() {
        let other = history(
            "2",
            "Other Fund",
            &[("01-01-2024", "10"), ("02-01-2024", "0"), ("03-01-2024", "12")],
        );

        match build_comparison(&[sample_history(), other]) {
            View::Comparison { chart } => {
                assert_eq!(chart.series.len(), 2);
                let points = &chart.series[1].points;
                assert_eq!(points.len(), 3);
                assert_eq!(points[1].1, 11.0);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_average_aum() {
        assert!(build_average_aum("July - September 2024", &[]).is_placeholder());

        let records = vec![AumRecord::new("Axis Mutual Fund", 100.5, 0.25)];
        match build_average_aum("July - September 2024", &records) {
            View::Table { title, table } => {
                assert_eq!(title, "Average AUM (July - September 2024)");
                assert_eq!(table.rows[0], vec!["Axis Mutual Fund", "100.75"]);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_performance() {
        match build_performance(&sample_history()) {
            View::Performance { bars, table, .. } => {
                assert_eq!(bars.len(), 2);
                assert_eq!(bars[0].label, "Jan");
                assert!((bars[0].value - (2.0 / 3.0)).abs() < 1e-9);
                assert_eq!(bars[1].value, 1.0);
                assert_eq!(table.rows[0][2], "3");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_risk_view() {
        let params = SimulationParams {
            num_simulations: 80,
            num_days: 30,
            seed: Some(1),
        };

        match build_risk(&sample_history(), &params, 0.06) {
            View::Risk(risk) => {
                assert_eq!(risk.metrics.len(), 5);
                assert_eq!(risk.metrics[0].label, "Annualised Volatility");
                assert!(risk.metrics[0].value.ends_with('%'));
                assert_eq!(risk.simulation.paths.len(), 80);
                assert_eq!(risk.simulation_chart.series.len(), MAX_PLOTTED_PATHS);
                assert_eq!(risk.simulation.start_price, 103.0);
                assert_eq!(risk.returns_chart.series[0].points.len(), 4);
                assert_eq!(risk.simulation_stats[0].label, "Expected Final NAV");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_risk_view_flat_series_shows_na_sharpe() {
        let flat = history(
            "1",
            "Liquid Fund",
            &[("01-01-2024", "10"), ("02-01-2024", "10"), ("03-01-2024", "10")],
        );
        let params = SimulationParams {
            num_simulations: 1,
            num_days: 0,
            seed: None,
        };

        match build_risk(&flat, &params, 0.06) {
            View::Risk(risk) => {
                assert_eq!(risk.metrics[2].value, "N/A (zero volatility)");
                assert_eq!(risk.simulation.final_stats.min, 10.0);
                assert_eq!(risk.simulation.final_stats.max, 10.0);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_risk_view_insufficient_history() {
        let short = history("1", "New Fund", &[("01-01-2024", "10"), ("02-01-2024", "11")]);
        let view = build_risk(&short, &SimulationParams::default(), 0.06);
        assert!(view.is_placeholder());
    }

    #[test]
    fn test_bounds_never_empty() {
        assert_eq!(bounds(std::iter::empty(), 0.05), [0.0, 1.0]);
        let [lo, hi] = bounds([5.0, 5.0].into_iter(), 0.05);
        assert!(lo < 5.0 && hi > 5.0);
    }
}
