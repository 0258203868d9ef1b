// ============================================================================
// Zynovo - Tableau de bord des fonds communs de placement indiens
// ============================================================================
// Programme TUI : menu de sept modes (liste des fonds, détail, historique,
// comparaison, AUM moyens, performance mensuelle, risque & Monte Carlo).
// Données : AMFI (NAVAll.txt, AUM) et api.mfapi.in.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : un worker thread possède le runtime tokio
// 4. Channels mpsc : Query vers le worker, View vers l'UI
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use zynovo::api::FundClient;
use zynovo::app::{App, Query};
use zynovo::config::Settings;
use zynovo::models::Scheme;
use zynovo::ui::{events::EventHandler, render};
use zynovo::views::View;
use zynovo::worker::QueryRunner;

/// Lignes sautées par PageUp/PageDown
const SCROLL_PAGE: usize = 10;

// ============================================================================
// AppCommand / AppResult : messages avec le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker exécute les tâches async (fetch + build)
// - Le résultat revient par un second channel
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Télécharger la liste des fonds (au démarrage, puis après un échec)
    LoadSchemes,

    /// Télécharger les données d'un mode et construire sa vue
    Run(Query),
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    SchemesLoaded(Vec<Scheme>),

    SchemesFailed(String),

    ViewReady { query: Query, view: View },

    Failed { context: String, error: String },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans ZYNOVO_LOG_DIR, sinon :
/// - Linux : ~/.local/share/zynovo/logs/zynovo.log
/// - macOS : ~/Library/Application Support/zynovo/logs/zynovo.log
/// - Windows : C:\Users\<user>\AppData\Local\zynovo\logs\zynovo.log
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/zynovo/logs/zynovo.log
/// RUST_LOG=zynovo=trace cargo run
/// ```
fn init_logging(settings: &Settings) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = settings.resolved_log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "zynovo.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // RUST_LOG prime ; par défaut debug pour zynovo, info pour le reste
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zynovo=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialised");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    // Le logging n'est pas indispensable : on continue sans
    init_logging(&settings).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("Zynovo starting up");

    let client = FundClient::new(settings)?;

    let app = Arc::new(Mutex::new(App::new()));

    // CONCEPT RUST : mpsc channels
    // - command_tx/rx : UI -> worker
    // - result_tx/rx : worker -> UI
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    spawn_background_worker(runtime, QueryRunner::new(client), command_rx, result_tx, app.clone());

    // La liste des fonds sert au sélecteur : on la demande tout de suite
    if command_tx.send(AppCommand::LoadSchemes).is_err() {
        warn!("Cannot request scheme list: worker is gone");
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Verrouille l'état partagé
///
/// Un thread qui panique en tenant le verrou l'empoisonne ; l'état reste
/// lisible, on le récupère plutôt que de paniquer à notre tour.
fn lock(app: &Mutex<App>) -> MutexGuard<'_, App> {
    app.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Thread + async runtime
// - std::thread::spawn() : crée un thread OS
// - Le runtime tokio est créé dans main() puis déplacé (move) dans le thread
// - block_on() bloque le worker, jamais l'UI
// ============================================================================

fn spawn_background_worker(
    runtime: tokio::runtime::Runtime,
    mut runner: QueryRunner,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
) {
    std::thread::spawn(move || {
        // Channel fermé (UI terminée) : recv() échoue et la boucle s'arrête
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            let mut results = Vec::with_capacity(2);

            match command {
                AppCommand::LoadSchemes => {
                    lock(&app).start_loading(Some("Loading scheme list from AMFI...".to_string()));

                    results.push(match runtime.block_on(runner.load_schemes()) {
                        Ok(schemes) => AppResult::SchemesLoaded(schemes),
                        Err(e) => {
                            error!(error = ?e, "Failed to load scheme list");
                            AppResult::SchemesFailed(format!("{:#}", e))
                        }
                    });
                }

                AppCommand::Run(query) => {
                    lock(&app).start_loading(Some(query.loading_message()));

                    // SchemeList peut télécharger la liste elle-même : le sélecteur la reçoit aussi
                    let had_schemes = !runner.schemes().is_empty();

                    let outcome = runtime.block_on(runner.run(&query));
                    if !had_schemes && !runner.schemes().is_empty() {
                        results.push(AppResult::SchemesLoaded(runner.schemes().to_vec()));
                    }

                    results.push(match outcome {
                        Ok(view) => AppResult::ViewReady { query, view },
                        Err(e) => {
                            error!(?query, error = ?e, "Query failed");
                            AppResult::Failed {
                                context: query.mode().label().to_string(),
                                error: format!("{:#}", e),
                            }
                        }
                    });
                }
            }

            lock(&app).stop_loading();

            if results.into_iter().any(|result| result_tx.send(result).is_err()) {
                break;
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Résultats du worker
//   1. Render
//   2. Input
//   3. Tick
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        if !lock(&app).is_running() {
            break;
        }

        // 0. RÉSULTATS : try_recv ne bloque pas
        match result_rx.try_recv() {
            Ok(result) => apply_result(&mut lock(&app), result),
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
                lock(&app).show_error("Background worker stopped; restart the application".to_string());
            }
        }

        // 1. RENDER
        {
            let app_lock = lock(&app);
            terminal.draw(|frame| render(frame, &app_lock))?;
        }

        // 2. INPUT
        match events.next() {
            Ok(event) => {
                let (query, reload_schemes) = {
                    let mut app_lock = lock(&app);
                    let query = handle_event(&mut app_lock, event);
                    (query, app_lock.take_scheme_reload())
                };

                if reload_schemes && command_tx.send(AppCommand::LoadSchemes).is_err() {
                    warn!("Cannot request scheme list: worker is gone");
                }
                if let Some(query) = query {
                    if command_tx.send(AppCommand::Run(query)).is_err() {
                        warn!("Cannot send query: worker is gone");
                    }
                }
            }
            Err(e) => warn!(error = ?e, "Failed to read terminal event"),
        }

        // 3. UPDATE
        lock(&app).tick();
    }

    Ok(())
}

/// Applique un résultat du worker à l'état
fn apply_result(app: &mut App, result: AppResult) {
    match result {
        AppResult::SchemesLoaded(schemes) => app.set_schemes(schemes),
        AppResult::SchemesFailed(error) => app.scheme_list_failed(error),
        AppResult::ViewReady { query, view } => {
            // Une réponse tardive d'un autre mode ne remplace pas la vue
            if query.mode() == app.mode {
                app.show_view(view);
            } else {
                debug!(?query, "Dropping view for inactive mode");
            }
        }
        AppResult::Failed { context, error } => {
            app.show_error(format!("{}: {}", context, error));
        }
    }
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement ; retourne la Query à envoyer au worker s'il y en a une
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Les saisies de texte passent en premier : 'q', 'r', 'h'... y sont
///   des caractères comme les autres
fn handle_event(app: &mut App, event: zynovo::ui::events::Event) -> Option<Query> {
    use zynovo::app::Focus;
    use zynovo::ui::events::{
        get_char_from_event, is_backspace_event, is_down_event, is_enter_event,
        is_escape_event, is_fewer_days_event, is_filter_event, is_left_event, is_more_days_event,
        is_page_down_event, is_page_up_event, is_quit_event, is_rerun_event, is_right_event,
        is_space_event, is_text_char_event, is_up_event, Event,
    };

    if let Event::Key(_) = event {
        if !is_quit_event(&event) || app.is_typing() {
            app.cancel_quit();
        }
    }

    match event {
        // ========================================
        // Saisie de texte (AMC, filtre)
        // ========================================
        Event::Key(_) if app.is_typing() && is_escape_event(&event) => {
            match app.focus {
                Focus::SchemeFilter => app.finish_filter(false),
                _ => app.back_to_menu(),
            }
            None
        }
        Event::Key(_) if app.is_typing() && is_enter_event(&event) => app.submit(),
        Event::Key(_) if app.is_typing() && is_backspace_event(&event) => {
            app.backspace();
            None
        }
        Event::Key(_) if app.is_typing() && is_text_char_event(&event) => {
            if let Some(c) = get_char_from_event(&event) {
                app.push_char(c);
            }
            None
        }
        Event::Key(_) if app.is_typing() => None,

        // ========================================
        // Commandes globales
        // ========================================
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
            None
        }
        Event::Key(_) if is_rerun_event(&event) => {
            let query = app.rerun();
            if query.is_none() {
                debug!("Nothing to rerun");
            }
            query
        }
        Event::Key(_) if is_page_down_event(&event) => {
            app.scroll_down(SCROLL_PAGE);
            None
        }
        Event::Key(_) if is_page_up_event(&event) => {
            app.scroll_up(SCROLL_PAGE);
            None
        }
        Event::Key(_) if is_enter_event(&event) => app.submit(),

        // ========================================
        // Menu
        // ========================================
        Event::Key(_) if app.focus == Focus::Menu && is_up_event(&event) => {
            app.menu_up();
            None
        }
        Event::Key(_) if app.focus == Focus::Menu && is_down_event(&event) => {
            app.menu_down();
            None
        }

        // ========================================
        // Liste des fonds
        // ========================================
        Event::Key(_) if app.focus == Focus::SchemePicker && is_escape_event(&event) => {
            app.back_to_menu();
            None
        }
        Event::Key(_) if app.focus == Focus::SchemePicker && is_up_event(&event) => {
            app.picker_up();
            None
        }
        Event::Key(_) if app.focus == Focus::SchemePicker && is_down_event(&event) => {
            app.picker_down();
            None
        }
        Event::Key(_) if app.focus == Focus::SchemePicker && is_filter_event(&event) => {
            app.start_filter();
            None
        }
        Event::Key(_) if app.focus == Focus::SchemePicker && is_space_event(&event) => {
            app.toggle_selected();
            None
        }

        // ========================================
        // Curseurs de simulation
        // ========================================
        Event::Key(_) if app.mode.has_simulation() && is_left_event(&event) => {
            app.fewer_simulations()
        }
        Event::Key(_) if app.mode.has_simulation() && is_right_event(&event) => {
            app.more_simulations()
        }
        Event::Key(_) if app.mode.has_simulation() && is_fewer_days_event(&event) => {
            app.fewer_days()
        }
        Event::Key(_) if app.mode.has_simulation() && is_more_days_event(&event) => app.more_days(),

        _ => None,
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
