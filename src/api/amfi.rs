// ============================================================================
// API : AMFI (Association of Mutual Funds in India)
// ============================================================================
// Deux sources publiées par l'AMFI :
//
// 1. NAVAll.txt : liste de tous les fonds avec leur dernière NAV
//    Format texte, séparateur ';' :
//      Scheme Code;ISIN Div Payout/ ISIN Growth;ISIN Div Reinvestment;Scheme Name;Net Asset Value;Date
//      Open Ended Schemes(Debt Scheme - Banking and PSU Fund)      <- catégorie
//      Aditya Birla Sun Life Mutual Fund                           <- société
//      119551;INF209KA12Z1;INF209KA13Z9;Aditya Birla ... - IDCW;105.0917;15-Oct-2024
//
// 2. AverageAUMDetails : tableau HTML des encours moyens par société
//    (une ligne <tr> par société : nom, AAUM domestique, AAUM étranger)
// ============================================================================

use std::sync::OnceLock;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::api::client::{ensure_success, FundClient};
use crate::models::nav::parse_nav_value;
use crate::models::{AumRecord, Scheme};

/// Format des dates dans NAVAll.txt (ex: "15-Oct-2024")
const NAV_ALL_DATE_FORMAT: &str = "%d-%b-%Y";

/// Préfixes des lignes de catégorie
const CATEGORY_PREFIXES: [&str; 3] = ["Open Ended Schemes", "Close Ended Schemes", "Interval Fund Schemes"];

// ============================================================================
// Liste des fonds
// ============================================================================

/// Télécharge et parse la liste complète des fonds
#[instrument(skip(client))]
pub async fn fetch_scheme_codes(client: &FundClient) -> Result<Vec<Scheme>> {
    let url = client.settings().nav_all_url.clone();
    let body = client
        .get(&url, "AMFI NAVAll")
        .await?
        .text()
        .await
        .context("Échec de la lecture de NAVAll.txt")?;

    let schemes = parse_nav_all(&body);
    info!(schemes = schemes.len(), "Scheme list fetched");

    if schemes.is_empty() {
        warn!("NAVAll.txt contained no scheme rows");
    }
    Ok(schemes)
}

/// Parse le contenu de NAVAll.txt
///
/// CONCEPT : Parsing à état
/// - Les en-têtes de catégorie et de société s'appliquent aux lignes suivantes
/// - On garde l'en-tête courant dans deux Option<String>
pub fn parse_nav_all(body: &str) -> Vec<Scheme> {
    let mut schemes = Vec::new();
    let mut category: Option<String> = None;
    let mut fund_house: Option<String> = None;

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("Scheme Code") {
            continue;
        }

        if !line.contains(';') {
            if CATEGORY_PREFIXES.iter().any(|p| line.starts_with(p)) {
                category = Some(extract_category(line));
                fund_house = None;
            } else {
                fund_house = Some(line.to_string());
            }
            continue;
        }

        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.len() < 6 || fields[0].is_empty() || fields[3].is_empty() {
            debug!(line, "Skipping malformed NAVAll row");
            continue;
        }

        schemes.push(Scheme {
            code: fields[0].to_string(),
            name: fields[3].to_string(),
            fund_house: fund_house.clone(),
            category: category.clone(),
            latest_nav: parse_nav_value(fields[4]),
            nav_date: NaiveDate::parse_from_str(fields[5], NAV_ALL_DATE_FORMAT).ok(),
        });
    }

    schemes
}

/// "Open Ended Schemes(Debt Scheme - Gilt Fund)" -> "Debt Scheme - Gilt Fund"
fn extract_category(line: &str) -> String {
    match (line.find('('), line.rfind(')')) {
        (Some(open), Some(close)) if close > open + 1 => line[open + 1..close].trim().to_string(),
        _ => line.to_string(),
    }
}

/// Fonds dont le nom contient le nom de la société (insensible à la casse)
///
/// Une requête vide ne retourne rien.
pub fn available_schemes<'a>(schemes: &'a [Scheme], amc: &str) -> Vec<&'a Scheme> {
    schemes.iter().filter(|s| s.matches(amc)).collect()
}

// ============================================================================
// Encours moyens (AUM)
// ============================================================================

/// Télécharge les AUM moyens d'un trimestre (ex: "July - September 2024")
#[instrument(skip(client))]
pub async fn fetch_average_aum(client: &FundClient, period: &str) -> Result<Vec<AumRecord>> {
    let url = &client.settings().aum_url;
    debug!(url = %url, "Posting AUM request");

    let params = [
        ("AUmType", "F"),
        ("AumCatType", "Typewise"),
        ("MF_Id", "-1"),
        ("Year_Quarter", period),
    ];

    let response = client
        .http()
        .post(url.as_str())
        .form(&params)
        .send()
        .await
        .context("Échec de la requête HTTP vers AMFI AUM")?;

    let html = ensure_success(response, "AMFI AUM")?
        .text()
        .await
        .context("Échec de la lecture de la page AUM")?;

    let records = parse_aum_table(&html);
    info!(funds = records.len(), "Average AUM fetched");
    Ok(records)
}

fn row_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("valid row regex"))
}

fn cell_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("valid cell regex"))
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]+>").expect("valid tag regex"))
}

/// Extrait les lignes (société, domestique, étranger) du tableau HTML
///
/// Les lignes d'en-tête (<th>), les totaux et les montants illisibles
/// sont ignorés.
pub fn parse_aum_table(html: &str) -> Vec<AumRecord> {
    let mut records = Vec::new();

    for row in row_regex().captures_iter(html) {
        let cells: Vec<String> = cell_regex()
            .captures_iter(&row[1])
            .map(|cell| clean_cell(&cell[1]))
            .collect();

        if cells.len() < 3 || cells[0].is_empty() {
            continue;
        }
        if cells[0].to_lowercase().contains("total") {
            continue;
        }

        match (parse_amount(&cells[1]), parse_amount(&cells[2])) {
            (Some(domestic), Some(overseas)) => {
                records.push(AumRecord::new(cells[0].clone(), domestic, overseas));
            }
            _ => warn!(fund = %cells[0], "Skipping AUM row with non-numeric amounts"),
        }
    }

    records
}

/// Supprime les balises et entités HTML d'une cellule
fn clean_cell(raw: &str) -> String {
    let text = tag_regex().replace_all(raw, "");
    text.replace("&amp;", "&")
        .replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Montant AMFI ; une cellule vide ou "-" vaut zéro
fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        return Some(0.0);
    }
    parse_nav_value(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAV_ALL_FIXTURE: &str = "\
Scheme Code;ISIN Div Payout/ ISIN Growth;ISIN Div Reinvestment;Scheme Name;Net Asset Value;Date

Open Ended Schemes(Debt Scheme - Banking and PSU Fund)

Aditya Birla Sun Life Mutual Fund

119551;INF209KA12Z1;INF209KA13Z9;Aditya Birla Sun Life Banking & PSU Debt Fund  - DIRECT - IDCW;105.0917;15-Oct-2024
119552;INF209K01YM2;-;Aditya Birla Sun Life Banking & PSU Debt Fund - Growth;N.A.;15-Oct-2024

Axis Mutual Fund

120437;INF846K01DP8;-;Axis Banking & PSU Debt Fund - Direct Plan - Growth Option;2541.2061;15-Oct-2024

Open Ended Schemes(Equity Scheme - Small Cap Fund)

Axis Mutual Fund

125354;INF846K01K35;-;Axis Small Cap Fund - Direct Plan - Growth;117.51;15-Oct-2024
broken;row
";

    #[test]
    fn test_parse_nav_all() {
        let schemes = parse_nav_all(NAV_ALL_FIXTURE);
        assert_eq!(schemes.len(), 4);

        let first = &schemes[0];
        assert_eq!(first.code, "119551");
        assert_eq!(first.fund_house.as_deref(), Some("Aditya Birla Sun Life Mutual Fund"));
        assert_eq!(first.category.as_deref(), Some("Debt Scheme - Banking and PSU Fund"));
        assert_eq!(first.latest_nav, Some(105.0917));
        assert_eq!(first.nav_date, NaiveDate::from_ymd_opt(2024, 10, 15));

        // NAV "N.A." : fonds gardé, NAV absente
        assert_eq!(schemes[1].latest_nav, None);

        let small_cap = &schemes[3];
        assert_eq!(small_cap.fund_house.as_deref(), Some("Axis Mutual Fund"));
        assert_eq!(small_cap.category.as_deref(), Some("Equity Scheme - Small Cap Fund"));
    }

    #[test]
    fn test_available_schemes() {
        let schemes = parse_nav_all(NAV_ALL_FIXTURE);

        let axis = available_schemes(&schemes, "axis");
        assert_eq!(axis.len(), 2);
        assert!(axis.iter().all(|s| s.name.starts_with("Axis")));

        assert!(available_schemes(&schemes, "HDFC").is_empty());
        assert!(available_schemes(&schemes, "").is_empty());
    }

    #[test]
    fn test_parse_aum_table() {
        let html = r#"
<table>
  <thead><tr><th>Mutual Fund Name</th><th>Domestic</th><th>Overseas</th></tr></thead>
  <tbody>
    <tr><td><b>Axis Mutual Fund</b></td><td>3,05,123.45</td><td>1,234.55</td></tr>
    <tr class="odd"><td>Bandhan Mutual Fund</td><td>1,50,000.00</td><td>-</td></tr>
    <tr><td>HDFC Mutual Fund &amp; Co</td><td>N.A.</td><td>10</td></tr>
    <tr><td>Grand Total</td><td>4,55,123.45</td><td>1,234.55</td></tr>
  </tbody>
</table>"#;

        let records = parse_aum_table(html);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].fund_name, "Axis Mutual Fund");
        assert_eq!(records[0].aaum_domestic, 305123.45);
        assert_eq!(records[0].aaum_overseas, 1234.55);
        assert!((records[0].total() - 306358.0).abs() < 1e-6);

        assert_eq!(records[1].aaum_overseas, 0.0);
    }

    #[test]
    fn test_parse_aum_table_empty() {
        assert!(parse_aum_table("<html><body>No records</body></html>").is_empty());
    }
}
