// ============================================================================
// Module : models
// ============================================================================
// Structures de données transitoires, reconstruites à chaque requête
// (aucune persistance)
// ============================================================================

pub mod aum;    // Encours moyens par société de gestion
pub mod nav;    // Historique des NAV
pub mod scheme; // Fonds et détail d'un fonds

// Re-export des structures principales
pub use aum::AumRecord;
pub use nav::{NavHistory, NavRecord};
pub use scheme::{Scheme, SchemeDetails};
