// ============================================================================
// API : api.mfapi.in
// ============================================================================
// GET {base}/{scheme_code} retourne le détail et tout l'historique :
//
// {
//   "meta": { "fund_house": "...", "scheme_type": "...", "scheme_category": "...",
//             "scheme_code": 119551, "scheme_name": "..." },
//   "data": [ { "date": "16-10-2024", "nav": "105.09170" }, ... ],   <- récent d'abord
//   "status": "SUCCESS"
// }
//
// Un code inconnu renvoie un "meta" vide et "data": [] (pas une erreur HTTP).
// ============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::api::client::FundClient;
use crate::models::nav::{parse_nav_date, parse_nav_value};
use crate::models::{NavHistory, SchemeDetails};

// ============================================================================
// Structures pour parser la réponse JSON
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct MfApiResponse {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    data: Vec<NavPoint>,
}

/// Métadonnées : tous les champs sont optionnels (code inconnu = meta vide)
#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    fund_house: Option<String>,
    #[serde(default)]
    scheme_type: Option<String>,
    #[serde(default)]
    scheme_category: Option<String>,
    /// Nombre ou chaîne selon les fonds
    #[serde(default)]
    scheme_code: Option<Value>,
    #[serde(default)]
    scheme_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NavPoint {
    date: String,
    nav: String,
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Détail d'un fonds ; None si le code est inconnu
#[instrument(skip(client))]
pub async fn fetch_scheme_details(client: &FundClient, code: &str) -> Result<Option<SchemeDetails>> {
    let response = fetch_scheme(client, code).await?;
    let details = details_from_response(&response);
    if details.is_none() {
        warn!("No details returned for scheme");
    }
    Ok(details)
}

/// Historique des NAV, trié par date croissante, lignes non numériques retirées
#[instrument(skip(client))]
pub async fn fetch_historical_nav(client: &FundClient, code: &str) -> Result<NavHistory> {
    let response = fetch_scheme(client, code).await?;
    let history = history_from_response(code, response);
    info!(points = history.len(), "Historical NAV fetched");
    Ok(history)
}

async fn fetch_scheme(client: &FundClient, code: &str) -> Result<MfApiResponse> {
    let code = code.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("Code de fonds invalide : {:?}", code);
    }

    let url = format!("{}/{}", client.settings().mfapi_url, code);
    debug!(url = %url, "Built mfapi URL");

    client
        .get(&url, "api.mfapi.in")
        .await?
        .json::<MfApiResponse>()
        .await
        .context("Échec du parsing JSON de la réponse mfapi")
}

// ============================================================================
// Conversion vers nos structures
// ============================================================================

pub(crate) fn details_from_response(response: &MfApiResponse) -> Option<SchemeDetails> {
    let meta = &response.meta;
    let scheme_name = meta.scheme_name.clone()?;

    let scheme_code = match &meta.scheme_code {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    // L'API renvoie le plus récent d'abord : le point de départ est le dernier
    let start = response.data.last();

    Some(SchemeDetails {
        fund_house: meta.fund_house.clone().unwrap_or_default(),
        scheme_type: meta.scheme_type.clone().unwrap_or_default(),
        scheme_category: meta.scheme_category.clone().unwrap_or_default(),
        scheme_code,
        scheme_name,
        start_date: start.and_then(|p| parse_nav_date(&p.date)),
        start_nav: start.and_then(|p| parse_nav_value(&p.nav)),
    })
}

pub(crate) fn history_from_response(code: &str, response: MfApiResponse) -> NavHistory {
    let name = response.meta.scheme_name.unwrap_or_default();
    NavHistory::from_raw(
        code.to_string(),
        name,
        response.data.into_iter().map(|p| (p.date, p.nav)),
    )
}

// ============================================================================
// Tests unitaires
// ============================================================================
