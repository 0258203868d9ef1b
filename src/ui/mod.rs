// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod chart;     // Graphiques ligne et barres
pub mod dashboard; // Layout : header, menu, entrées, footer
pub mod events;    // Gestion des événements clavier
pub mod panels;    // Panneau principal : rendu d'une View

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
