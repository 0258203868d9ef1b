// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global du tableau de bord TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Les actions qui demandent des données retournent une Query :
//    App ne fait jamais d'appel réseau, main.rs transmet la Query au worker
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// ============================================================================

use tracing::{debug, info, warn};

use crate::analytics::monte_carlo::{MAX_DAYS, MAX_SIMULATIONS, MIN_DAYS, MIN_SIMULATIONS};
use crate::analytics::SimulationParams;
use crate::models::Scheme;
use crate::views::{Mode, View};

/// Pas du curseur "nombre de simulations"
pub const SIMULATION_STEP: usize = 100;

/// Pas du curseur "horizon en jours"
pub const DAYS_STEP: usize = 5;

// ============================================================================
// Enum : Focus
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul composant reçoit les touches à la fois
// - Les deux modes "saisie" capturent tous les caractères (Vim-like)
// ============================================================================

/// Composant qui reçoit le clavier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Menu des sept modes
    Menu,

    /// Saisie du nom de la société de gestion (AMC)
    AmcInput,

    /// Liste des fonds
    SchemePicker,

    /// Saisie du filtre de la liste des fonds (après '/')
    SchemeFilter,
}

// ============================================================================
// Enum : Query
// ============================================================================

/// Demande de données transmise au worker
///
/// Chaque variante porte tous ses paramètres : le worker n'a besoin
/// d'aucun autre état pour construire la vue.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    SchemeList { amc: String },
    SchemeDetails { code: String },
    HistoricalNav { code: String },
    Compare { codes: Vec<String> },
    AverageAum,
    Performance { code: String },
    Risk { code: String, params: SimulationParams },
}

impl Query {
    pub fn mode(&self) -> Mode {
        match self {
            Query::SchemeList { .. } => Mode::ViewAllSchemes,
            Query::SchemeDetails { .. } => Mode::SchemeDetails,
            Query::HistoricalNav { .. } => Mode::HistoricalNav,
            Query::Compare { .. } => Mode::CompareNavs,
            Query::AverageAum => Mode::AverageAum,
            Query::Performance { .. } => Mode::SchemePerformance,
            Query::Risk { .. } => Mode::RiskVolatility,
        }
    }

    /// Message affiché pendant le chargement
    pub fn loading_message(&self) -> String {
        match self {
            Query::SchemeList { amc } => format!("Searching schemes for \"{}\"...", amc),
            Query::Compare { codes } => format!("Loading {} NAV histories...", codes.len()),
            Query::AverageAum => "Loading average AUM...".to_string(),
            Query::SchemeDetails { code }
            | Query::HistoricalNav { code }
            | Query::Performance { code }
            | Query::Risk { code, .. } => format!("{}: loading scheme {}...", self.mode().label(), code),
        }
    }

    /// Construit la requête d'un mode à fonds unique
    fn for_scheme(mode: Mode, code: String, params: SimulationParams) -> Option<Self> {
        match mode {
            Mode::SchemeDetails => Some(Query::SchemeDetails { code }),
            Mode::HistoricalNav => Some(Query::HistoricalNav { code }),
            Mode::SchemePerformance => Some(Query::Performance { code }),
            Mode::RiskVolatility => Some(Query::Risk { code, params }),
            Mode::ViewAllSchemes | Mode::CompareNavs | Mode::AverageAum => None,
        }
    }
}

/// État du téléchargement de la liste des fonds (NAVAll.txt)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeListState {
    /// Demandée au worker, pas encore reçue
    Loading,
    Loaded,
    /// Échec : 'r' ou l'entrée dans un mode à sélecteur la redemande
    Failed,
}

/// Images de l'indicateur de chargement, une par tick
pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Message de la barre de statut
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

// ============================================================================
// Structure : App
// ============================================================================

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Two-step quit : première pression de 'q' = confirmation demandée
    pub confirm_quit: bool,

    /// Composant actif
    pub focus: Focus,

    /// Position du curseur dans le menu
    pub menu_index: usize,

    /// Mode validé (celui dont les entrées sont affichées)
    pub mode: Mode,

    /// Tous les fonds connus (NAVAll.txt), chargés au démarrage
    pub schemes: Vec<Scheme>,
    pub scheme_list: SchemeListState,

    /// Nouveau téléchargement de la liste à envoyer au worker
    reload_schemes: bool,

    /// Filtre de la liste des fonds
    pub scheme_filter: String,

    /// Position du curseur dans la liste filtrée
    pub scheme_cursor: usize,

    /// Codes cochés pour la comparaison, dans l'ordre de sélection
    pub selected_codes: Vec<String>,

    /// Saisie du nom de l'AMC
    pub amc_input: String,

    /// Curseurs de la simulation Monte Carlo
    pub sim_params: SimulationParams,

    /// Contenu du panneau principal
    pub view: View,

    /// Défilement des tableaux du panneau principal
    pub view_scroll: usize,

    /// Dernière requête envoyée (pour 'r')
    pub last_query: Option<Query>,

    /// Chargement en cours (mis à jour par le worker)
    pub is_loading: bool,
    pub loading_message: Option<String>,

    /// Avance à chaque tick pendant un chargement
    pub spinner_frame: usize,

    pub status: Option<Status>,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            confirm_quit: false,
            focus: Focus::Menu,
            menu_index: 0,
            mode: Mode::default(),
            schemes: Vec::new(),
            scheme_list: SchemeListState::Loading,
            reload_schemes: false,
            scheme_filter: String::new(),
            scheme_cursor: 0,
            selected_codes: Vec::new(),
            amc_input: String::new(),
            sim_params: SimulationParams::default(),
            view: View::placeholder(
                "Indian Mutual Fund Dashboard",
                "Select a mode from the menu and press Enter",
            ),
            view_scroll: 0,
            last_query: None,
            is_loading: false,
            loading_message: None,
            spinner_frame: 0,
            status: None,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    /// Appelé à chaque itération de la boucle : anime l'indicateur de chargement
    pub fn tick(&mut self) {
        if self.is_loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        } else {
            self.spinner_frame = 0;
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    // ========================================================================
    // Chargement et résultats
    // ========================================================================

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }

    /// Installe la liste des fonds reçue du worker
    pub fn set_schemes(&mut self, schemes: Vec<Scheme>) {
        info!(count = schemes.len(), "Scheme list installed");
        self.status = Some(Status::Info(format!("{} schemes loaded", schemes.len())));
        self.schemes = schemes;
        self.scheme_list = SchemeListState::Loaded;
        self.scheme_cursor = 0;
    }

    /// Le téléchargement de la liste des fonds a échoué
    pub fn scheme_list_failed(&mut self, error: String) {
        warn!(%error, "Scheme list unavailable");
        self.scheme_list = SchemeListState::Failed;
        self.show_error(format!("Scheme list: {} (press r to retry)", error));
    }

    /// Redemande la liste si le dernier téléchargement a échoué
    fn retry_scheme_list(&mut self) {
        if self.scheme_list == SchemeListState::Failed {
            info!("Retrying scheme list download");
            self.scheme_list = SchemeListState::Loading;
            self.reload_schemes = true;
            self.status = Some(Status::Info("Reloading scheme list...".to_string()));
        }
    }

    /// Vrai une seule fois après une demande de nouveau téléchargement
    pub fn take_scheme_reload(&mut self) -> bool {
        std::mem::take(&mut self.reload_schemes)
    }

    pub fn show_view(&mut self, view: View) {
        self.status = None;
        self.view = view;
        self.view_scroll = 0;
    }

    /// PageDown : la borne haute est appliquée au rendu (taille du tableau)
    pub fn scroll_down(&mut self, lines: usize) {
        self.view_scroll = self.view_scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.view_scroll = self.view_scroll.saturating_sub(lines);
    }

    pub fn show_error(&mut self, message: String) {
        self.status = Some(Status::Error(message));
    }

    // ========================================================================
    // Menu
    // ========================================================================

    pub fn menu_up(&mut self) {
        self.menu_index = self.menu_index.saturating_sub(1);
    }

    pub fn menu_down(&mut self) {
        self.menu_index = (self.menu_index + 1).min(Mode::ALL.len() - 1);
    }

    /// Mode sous le curseur du menu
    pub fn highlighted_mode(&self) -> Mode {
        Mode::ALL[self.menu_index.min(Mode::ALL.len() - 1)]
    }

    /// Valide le mode sous le curseur
    ///
    /// Average AUM n'a pas d'entrée : la requête part tout de suite.
    /// Les autres modes donnent le focus à leur entrée.
    pub fn select_mode(&mut self) -> Option<Query> {
        let mode = self.highlighted_mode();
        info!(mode = mode.label(), "Mode selected");

        self.mode = mode;
        self.selected_codes.clear();
        self.last_query = None;
        self.status = None;

        if mode.needs_amc() {
            self.focus = Focus::AmcInput;
            None
        } else if mode.needs_scheme() {
            self.focus = Focus::SchemePicker;
            match self.scheme_list {
                SchemeListState::Failed => self.retry_scheme_list(),
                SchemeListState::Loading => {
                    self.status = Some(Status::Info("Scheme list is still loading...".to_string()));
                }
                SchemeListState::Loaded => {}
            }
            None
        } else {
            self.remember(Query::AverageAum)
        }
    }

    /// Retour au menu (ESC)
    pub fn back_to_menu(&mut self) {
        self.focus = Focus::Menu;
    }

    // ========================================================================
    // Saisie de texte
    // ========================================================================

    /// Le clavier est-il capturé par une saisie de texte ?
    pub fn is_typing(&self) -> bool {
        matches!(self.focus, Focus::AmcInput | Focus::SchemeFilter)
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            Focus::AmcInput => self.amc_input.push(c),
            Focus::SchemeFilter => {
                self.scheme_filter.push(c);
                self.scheme_cursor = 0;
            }
            Focus::Menu | Focus::SchemePicker => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Focus::AmcInput => {
                self.amc_input.pop();
            }
            Focus::SchemeFilter => {
                self.scheme_filter.pop();
                self.scheme_cursor = 0;
            }
            Focus::Menu | Focus::SchemePicker => {}
        }
    }

    /// '/' : commence à filtrer la liste des fonds
    pub fn start_filter(&mut self) {
        if self.focus == Focus::SchemePicker {
            self.focus = Focus::SchemeFilter;
        }
    }

    /// Fin du filtre ; `keep = false` l'efface
    pub fn finish_filter(&mut self, keep: bool) {
        if !keep {
            self.scheme_filter.clear();
            self.scheme_cursor = 0;
        }
        self.focus = Focus::SchemePicker;
    }

    // ========================================================================
    // Liste des fonds
    // ========================================================================

    /// Fonds visibles avec le filtre courant
    pub fn filtered_schemes(&self) -> Vec<&Scheme> {
        if self.scheme_filter.trim().is_empty() {
            self.schemes.iter().collect()
        } else {
            self.schemes
                .iter()
                .filter(|s| s.matches(&self.scheme_filter) || s.code == self.scheme_filter.trim())
                .collect()
        }
    }

    pub fn cursor_scheme(&self) -> Option<&Scheme> {
        self.filtered_schemes().get(self.scheme_cursor).copied()
    }

    pub fn picker_up(&mut self) {
        self.scheme_cursor = self.scheme_cursor.saturating_sub(1);
    }

    pub fn picker_down(&mut self) {
        let max_index = self.filtered_schemes().len().saturating_sub(1);
        self.scheme_cursor = (self.scheme_cursor + 1).min(max_index);
    }

    /// Espace : coche/décoche le fonds sous le curseur (comparaison)
    pub fn toggle_selected(&mut self) {
        if !self.mode.is_multi_select() {
            return;
        }
        let Some(code) = self.cursor_scheme().map(|s| s.code.clone()) else {
            return;
        };

        if let Some(pos) = self.selected_codes.iter().position(|c| *c == code) {
            self.selected_codes.remove(pos);
            debug!(%code, "Scheme unselected");
        } else {
            self.selected_codes.push(code);
        }
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected_codes.iter().any(|c| c == code)
    }

    // ========================================================================
    // Curseurs de simulation
    // ========================================================================

    // Chaque curseur relance la simulation affichée, si elle existe
    // (retourne la nouvelle Query Risk)

    pub fn more_simulations(&mut self) -> Option<Query> {
        self.set_sim_params(SimulationParams {
            num_simulations: (self.sim_params.num_simulations + SIMULATION_STEP)
                .min(MAX_SIMULATIONS),
            ..self.sim_params
        })
    }

    pub fn fewer_simulations(&mut self) -> Option<Query> {
        self.set_sim_params(SimulationParams {
            num_simulations: self
                .sim_params
                .num_simulations
                .saturating_sub(SIMULATION_STEP)
                .max(MIN_SIMULATIONS),
            ..self.sim_params
        })
    }

    pub fn more_days(&mut self) -> Option<Query> {
        self.set_sim_params(SimulationParams {
            num_days: (self.sim_params.num_days + DAYS_STEP).min(MAX_DAYS),
            ..self.sim_params
        })
    }

    pub fn fewer_days(&mut self) -> Option<Query> {
        self.set_sim_params(SimulationParams {
            num_days: self
                .sim_params
                .num_days
                .saturating_sub(DAYS_STEP)
                .max(MIN_DAYS),
            ..self.sim_params
        })
    }

    fn set_sim_params(&mut self, params: SimulationParams) -> Option<Query> {
        // Curseur déjà en butée : rien ne change
        if params == self.sim_params {
            return None;
        }
        self.sim_params = params;

        if self.mode == Mode::RiskVolatility && matches!(self.last_query, Some(Query::Risk { .. })) {
            self.rerun()
        } else {
            None
        }
    }

    // ========================================================================
    // Requêtes
    // ========================================================================

    /// Entrée : valide l'entrée du mode courant
    pub fn submit(&mut self) -> Option<Query> {
        match self.focus {
            Focus::Menu => self.select_mode(),
            Focus::SchemeFilter => {
                self.finish_filter(true);
                None
            }
            Focus::AmcInput => {
                let amc = self.amc_input.trim().to_string();
                if amc.is_empty() {
                    self.show_error("Enter an AMC name first".to_string());
                    return None;
                }
                self.remember(Query::SchemeList { amc })
            }
            Focus::SchemePicker => {
                if self.mode.is_multi_select() {
                    let codes = self.selected_codes.clone();
                    return self.remember(Query::Compare { codes });
                }

                let Some(code) = self.cursor_scheme().map(|s| s.code.clone()) else {
                    self.show_error("No scheme selected".to_string());
                    return None;
                };
                let query = Query::for_scheme(self.mode, code, self.sim_params)?;
                self.remember(query)
            }
        }
    }

    /// 'r' : relance la dernière requête du mode courant avec les curseurs actuels
    ///
    /// Redemande aussi la liste des fonds si son téléchargement a échoué.
    pub fn rerun(&mut self) -> Option<Query> {
        self.retry_scheme_list();

        let last = self.last_query.clone()?;
        if last.mode() != self.mode {
            debug!(?last, "Last query belongs to another mode");
            return None;
        }

        let query = match last {
            Query::Risk { code, .. } => Query::Risk {
                code,
                params: self.sim_params,
            },
            other => other,
        };
        self.remember(query)
    }

    fn remember(&mut self, query: Query) -> Option<Query> {
        self.last_query = Some(query.clone());
        Some(query)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::monte_carlo::{DEFAULT_DAYS, DEFAULT_SIMULATIONS};

    fn app_with_schemes() -> App {
        let mut app = App::new();
        app.set_schemes(vec![
            Scheme::new("119551", "Aditya Birla Sun Life Banking & PSU Debt Fund"),
            Scheme::new("120465", "Axis Bluechip Fund - Direct Plan - Growth"),
            Scheme::new("125354", "Axis Small Cap Fund - Direct Plan - Growth"),
        ]);
        app
    }

    fn select(app: &mut App, mode: Mode) -> Option<Query> {
        app.menu_index = mode.index();
        app.select_mode()
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert_eq!(app.focus, Focus::Menu);
        assert_eq!(app.sim_params.num_simulations, DEFAULT_SIMULATIONS);
        assert_eq!(app.sim_params.num_days, DEFAULT_DAYS);
        assert!(app.view.is_placeholder());
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::new();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_menu_navigation_is_bounded() {
        let mut app = App::new();
        app.menu_up();
        assert_eq!(app.menu_index, 0);

        for _ in 0..20 {
            app.menu_down();
        }
        assert_eq!(app.menu_index, 6);
        assert_eq!(app.highlighted_mode(), Mode::RiskVolatility);
    }

    #[test]
    fn test_average_aum_runs_immediately() {
        let mut app = App::new();
        assert_eq!(select(&mut app, Mode::AverageAum), Some(Query::AverageAum));
        assert_eq!(app.focus, Focus::Menu);
        assert_eq!(app.last_query, Some(Query::AverageAum));
    }

    #[test]
    fn test_amc_input() {
        let mut app = App::new();
        assert_eq!(select(&mut app, Mode::ViewAllSchemes), None);
        assert_eq!(app.focus, Focus::AmcInput);
        assert!(app.is_typing());

        // Vide : erreur, pas de requête
        assert_eq!(app.submit(), None);
        assert!(matches!(app.status, Some(Status::Error(_))));

        for c in "Axisx".chars() {
            app.push_char(c);
        }
        app.backspace();
        assert_eq!(
            app.submit(),
            Some(Query::SchemeList { amc: "Axis".to_string() })
        );
    }

    #[test]
    fn test_scheme_filter() {
        let mut app = app_with_schemes();
        select(&mut app, Mode::HistoricalNav);
        assert_eq!(app.focus, Focus::SchemePicker);
        assert_eq!(app.filtered_schemes().len(), 3);

        app.start_filter();
        for c in "small".chars() {
            app.push_char(c);
        }
        assert_eq!(app.filtered_schemes().len(), 1);
        app.finish_filter(true);
        assert_eq!(app.focus, Focus::SchemePicker);

        assert_eq!(
            app.submit(),
            Some(Query::HistoricalNav { code: "125354".to_string() })
        );

        app.start_filter();
        app.finish_filter(false);
        assert!(app.scheme_filter.is_empty());
        assert_eq!(app.filtered_schemes().len(), 3);
    }

    #[test]
    fn test_filter_by_code() {
        let mut app = app_with_schemes();
        select(&mut app, Mode::SchemeDetails);
        app.start_filter();
        for c in "120465".chars() {
            app.push_char(c);
        }
        assert_eq!(app.cursor_scheme().map(|s| s.code.as_str()), Some("120465"));
    }

    #[test]
    fn test_picker_navigation_is_bounded() {
        let mut app = app_with_schemes();
        select(&mut app, Mode::SchemeDetails);

        for _ in 0..10 {
            app.picker_down();
        }
        assert_eq!(app.scheme_cursor, 2);
        app.picker_up();
        assert_eq!(app.scheme_cursor, 1);
    }

    #[test]
    fn test_compare_multi_select() {
        let mut app = app_with_schemes();
        select(&mut app, Mode::CompareNavs);

        app.toggle_selected();
        app.picker_down();
        app.toggle_selected();
        assert!(app.is_selected("119551"));
        assert!(app.is_selected("120465"));

        // Deuxième pression : décoche
        app.toggle_selected();
        assert!(!app.is_selected("120465"));
        app.picker_down();
        app.toggle_selected();

        assert_eq!(
            app.submit(),
            Some(Query::Compare {
                codes: vec!["119551".to_string(), "125354".to_string()]
            })
        );
    }

    #[test]
    fn test_toggle_ignored_outside_compare() {
        let mut app = app_with_schemes();
        select(&mut app, Mode::HistoricalNav);
        app.toggle_selected();
        assert!(app.selected_codes.is_empty());
    }

    #[test]
    fn test_simulation_sliders_are_clamped() {
        let mut app = App::new();

        for _ in 0..100 {
            app.more_simulations();
            app.more_days();
        }
        assert_eq!(app.sim_params.num_simulations, MAX_SIMULATIONS);
        assert_eq!(app.sim_params.num_days, MAX_DAYS);

        for _ in 0..100 {
            app.fewer_simulations();
            app.fewer_days();
        }
        assert_eq!(app.sim_params.num_simulations, MIN_SIMULATIONS);
        assert_eq!(app.sim_params.num_days, MIN_DAYS);
    }

    #[test]
    fn test_rerun_uses_current_sliders() {
        let mut app = app_with_schemes();
        assert_eq!(app.rerun(), None);

        select(&mut app, Mode::RiskVolatility);
        let first = app.submit();
        assert!(matches!(first, Some(Query::Risk { .. })));

        app.more_simulations();
        match app.rerun() {
            Some(Query::Risk { code, params }) => {
                assert_eq!(code, "119551");
                assert_eq!(params.num_simulations, DEFAULT_SIMULATIONS + SIMULATION_STEP);
            }
            other => panic!("unexpected query: {:?}", other),
        }
    }

    #[test]
    fn test_failed_scheme_list_is_requested_again() {
        let mut app = App::new();
        assert_eq!(app.scheme_list, SchemeListState::Loading);
        app.scheme_list_failed("HTTP 503".to_string());
        assert_eq!(app.scheme_list, SchemeListState::Failed);
        assert!(!app.take_scheme_reload());

        // Entrer dans un mode à sélecteur redemande la liste, une seule fois
        select(&mut app, Mode::RiskVolatility);
        assert_eq!(app.scheme_list, SchemeListState::Loading);
        assert_eq!(
            app.status,
            Some(Status::Info("Reloading scheme list...".to_string()))
        );
        assert!(app.take_scheme_reload());
        assert!(!app.take_scheme_reload());

        // Nouvel échec : 'r' redemande aussi
        app.scheme_list_failed("HTTP 503".to_string());
        assert_eq!(app.rerun(), None);
        assert!(app.take_scheme_reload());

        app.set_schemes(vec![Scheme::new("119551", "Aditya Birla Sun Life Banking & PSU Debt Fund")]);
        assert_eq!(app.scheme_list, SchemeListState::Loaded);
        assert!(matches!(app.submit(), Some(Query::Risk { .. })));
    }

    #[test]
    fn test_scheme_list_still_loading() {
        let mut app = App::new();
        select(&mut app, Mode::SchemeDetails);
        assert_eq!(
            app.status,
            Some(Status::Info("Scheme list is still loading...".to_string()))
        );
        assert!(!app.take_scheme_reload());
    }

    #[test]
    fn test_rerun_ignores_previous_mode() {
        let mut app = app_with_schemes();
        select(&mut app, Mode::HistoricalNav);
        assert!(app.submit().is_some());

        select(&mut app, Mode::SchemeDetails);
        assert_eq!(app.last_query, None);
        assert_eq!(app.rerun(), None);

        // Requête restée d'un autre mode (mode changé sans passer par le menu)
        app.last_query = Some(Query::HistoricalNav { code: "119551".to_string() });
        assert_eq!(app.rerun(), None);
    }

    #[test]
    fn test_sliders_rerun_displayed_simulation() {
        let mut app = app_with_schemes();
        select(&mut app, Mode::RiskVolatility);

        // Pas encore de simulation : le curseur bouge sans requête
        assert_eq!(app.more_days(), None);
        assert_eq!(app.sim_params.num_days, DEFAULT_DAYS + DAYS_STEP);

        assert!(app.submit().is_some());
        match app.fewer_simulations() {
            Some(Query::Risk { code, params }) => {
                assert_eq!(code, "119551");
                assert_eq!(params.num_simulations, DEFAULT_SIMULATIONS - SIMULATION_STEP);
                assert_eq!(params.num_days, DEFAULT_DAYS + DAYS_STEP);
            }
            other => panic!("unexpected query: {:?}", other),
        }

        // En butée : aucune relance
        while app.sim_params.num_days < MAX_DAYS {
            app.more_days();
        }
        assert_eq!(app.more_days(), None);
    }

    #[test]
    fn test_tick_animates_spinner_while_loading() {
        let mut app = App::new();
        app.tick();
        assert_eq!(app.spinner_frame, 0);

        app.start_loading(Some("Loading...".to_string()));
        app.tick();
        app.tick();
        assert_eq!(app.spinner(), SPINNER_FRAMES[2]);
        for _ in 0..SPINNER_FRAMES.len() {
            app.tick();
        }
        assert_eq!(app.spinner(), SPINNER_FRAMES[2]);

        app.stop_loading();
        app.tick();
        assert_eq!(app.spinner(), SPINNER_FRAMES[0]);
    }

    #[test]
    fn test_scroll_resets_on_new_view() {
        let mut app = App::new();
        app.scroll_up(3);
        assert_eq!(app.view_scroll, 0);
        app.scroll_down(20);
        assert_eq!(app.view_scroll, 20);

        app.show_view(View::placeholder("Average AUM", "No data found"));
        assert_eq!(app.view_scroll, 0);
    }

    #[test]
    fn test_query_mode_and_message() {
        let query = Query::Performance { code: "1".to_string() };
        assert_eq!(query.mode(), Mode::SchemePerformance);
        assert!(query.loading_message().contains("Scheme Performance"));
    }
}
