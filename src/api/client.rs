// ============================================================================
// API Client : FundClient
// ============================================================================
// Un seul client HTTP partagé par les sources AMFI et mfapi.
// Le client reqwest garde un pool de connexions : on le crée une fois
// au démarrage du worker au lieu d'un client par requête.
// ============================================================================

use anyhow::{Context, Result};
use reqwest::Response;
use tracing::{debug, error};

use crate::config::Settings;

/// User-Agent de navigateur : certaines pages AMFI refusent les clients nus
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Client HTTP + configuration des endpoints
#[derive(Debug, Clone)]
pub struct FundClient {
    http: reqwest::Client,
    settings: Settings,
}

impl FundClient {
    /// Crée le client à partir de la configuration
    pub fn new(settings: Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.http_timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// GET simple, échoue si le statut n'est pas 2xx
    pub(crate) async fn get(&self, url: &str, source: &str) -> Result<Response> {
        debug!(url = %url, source, "Sending HTTP GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Échec de la requête HTTP vers {}", source))?;

        ensure_success(response, source)
    }
}

/// Vérifie que la réponse est un succès HTTP (200-299)
pub(crate) fn ensure_success(response: Response, source: &str) -> Result<Response> {
    let status = response.status();
    debug!(status = %status, source, "Received HTTP response");

    if !status.is_success() {
        error!(status = %status, source, "Data provider returned error status");
        anyhow::bail!("{} a retourné une erreur : HTTP {}", source, status);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_settings() {
        let settings = Settings {
            aum_period: "April - June 2024".to_string(),
            ..Settings::default()
        };
        let client = FundClient::new(settings.clone()).unwrap();
        assert_eq!(client.settings(), &settings);
    }
}
