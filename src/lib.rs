// ============================================================================
// Zynovo - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod analytics; // Rendements, volatilité, Sharpe, Monte Carlo
pub mod api;       // AMFI + api.mfapi.in
pub mod app;       // État de l'application
pub mod config;    // Settings (variables ZYNOVO_*)
pub mod error;     // Erreurs des calculs
pub mod models;    // Structures de données
pub mod ui;        // Interface utilisateur
pub mod views;     // Vues prêtes à afficher
pub mod worker;    // Exécution des requêtes (fetch + build)
