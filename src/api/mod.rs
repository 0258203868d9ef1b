// ============================================================================
// Module : api
// ============================================================================
// Clients des sources de données : AMFI (liste des fonds, AUM) et
// api.mfapi.in (détail et historique des NAV)
// ============================================================================

pub mod amfi;   // NAVAll.txt + AUM moyens
pub mod client; // Client HTTP partagé
pub mod mfapi;  // Détail + historique d'un fonds

// Re-export des fonctions principales
pub use amfi::{available_schemes, fetch_average_aum, fetch_scheme_codes};
pub use client::FundClient;
pub use mfapi::{fetch_historical_nav, fetch_scheme_details};
