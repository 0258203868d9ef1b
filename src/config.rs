// ============================================================================
// Configuration : Settings
// ============================================================================
// Toute la configuration passe par des variables d'environnement ZYNOVO_*
// (éventuellement chargées depuis un fichier .env).
//
// CONCEPT : Paramètres explicites
// - Plus de client API global : les URLs et constantes sont dans Settings
// - Settings est passé au client et aux constructeurs de vues
// ============================================================================

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

/// Liste complète des schémas et dernières NAV publiée par l'AMFI
pub const DEFAULT_NAV_ALL_URL: &str = "https://www.amfiindia.com/spages/NAVAll.txt";

/// API publique des historiques de NAV
pub const DEFAULT_MFAPI_URL: &str = "https://api.mfapi.in/mf";

/// Page AMFI des AUM moyens par société de gestion
pub const DEFAULT_AUM_URL: &str = "https://www.amfiindia.com/modules/AverageAUMDetails";

/// Trimestre interrogé par défaut pour les AUM moyens
pub const DEFAULT_AUM_PERIOD: &str = "July - September 2024";

/// Taux sans risque annuel utilisé pour le ratio de Sharpe
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.06;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// URL du fichier NAVAll.txt (liste des schémas)
    pub nav_all_url: String,

    /// URL de base de api.mfapi.in (sans slash final)
    pub mfapi_url: String,

    /// URL de la page AMFI des AUM moyens
    pub aum_url: String,

    /// Période des AUM moyens (ex: "July - September 2024")
    pub aum_period: String,

    /// Taux sans risque annuel (0.06 = 6 %)
    pub risk_free_rate: f64,

    /// Timeout des requêtes HTTP
    pub http_timeout: Duration,

    /// Répertoire des logs (None = emplacement par défaut)
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nav_all_url: DEFAULT_NAV_ALL_URL.to_string(),
            mfapi_url: DEFAULT_MFAPI_URL.to_string(),
            aum_url: DEFAULT_AUM_URL.to_string(),
            aum_period: DEFAULT_AUM_PERIOD.to_string(),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_dir: None,
        }
    }
}

impl Settings {
    /// Charge la configuration depuis l'environnement (.env inclus)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la configuration depuis une fonction de lookup
    ///
    /// CONCEPT RUST : Closure en paramètre
    /// - `F: Fn(&str) -> Option<String>` : n'importe quelle source de clés
    /// - Permet de tester sans toucher aux vraies variables d'environnement
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let risk_free_rate = parse_or("ZYNOVO_RISK_FREE_RATE", &lookup, defaults.risk_free_rate)?;
        let timeout_secs = parse_or("ZYNOVO_HTTP_TIMEOUT_SECS", &lookup, DEFAULT_HTTP_TIMEOUT_SECS)?;

        let settings = Self {
            nav_all_url: lookup("ZYNOVO_NAV_ALL_URL").unwrap_or(defaults.nav_all_url),
            mfapi_url: lookup("ZYNOVO_MFAPI_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.mfapi_url),
            aum_url: lookup("ZYNOVO_AUM_URL").unwrap_or(defaults.aum_url),
            aum_period: lookup("ZYNOVO_AUM_PERIOD").unwrap_or(defaults.aum_period),
            risk_free_rate,
            http_timeout: Duration::from_secs(timeout_secs),
            log_dir: lookup("ZYNOVO_LOG_DIR").map(PathBuf::from),
        };

        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Répertoire des logs effectif
    ///
    /// Ordre : ZYNOVO_LOG_DIR, puis ~/.local/share/zynovo/logs (Linux),
    /// puis ./logs si le système ne fournit pas de répertoire de données.
    pub fn resolved_log_dir(&self) -> PathBuf {
        if let Some(dir) = &self.log_dir {
            return dir.clone();
        }

        dirs::data_local_dir()
            .map(|dir| dir.join("zynovo").join("logs"))
            .unwrap_or_else(|| PathBuf::from("./logs"))
    }
}

/// Parse une variable si elle est présente, sinon retourne la valeur par défaut
fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Valeur invalide pour {} : {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.risk_free_rate, 0.06);
        assert_eq!(settings.aum_period, "July - September 2024");
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("ZYNOVO_MFAPI_URL", "http://localhost:8080/mf/"),
            ("ZYNOVO_RISK_FREE_RATE", "0.065"),
            ("ZYNOVO_HTTP_TIMEOUT_SECS", "5"),
            ("ZYNOVO_LOG_DIR", "/tmp/zynovo-logs"),
        ]))
        .unwrap();

        assert_eq!(settings.mfapi_url, "http://localhost:8080/mf");
        assert_eq!(settings.risk_free_rate, 0.065);
        assert_eq!(settings.http_timeout, Duration::from_secs(5));
        assert_eq!(settings.resolved_log_dir(), PathBuf::from("/tmp/zynovo-logs"));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = Settings::from_lookup(lookup_from(&[("ZYNOVO_RISK_FREE_RATE", "six")]))
            .unwrap_err();
        assert!(err.to_string().contains("ZYNOVO_RISK_FREE_RATE"));
    }
}
