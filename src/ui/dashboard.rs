// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
//   ┌──────────────── header ─────────────────┐
//   │ menu des modes   │                      │
//   │──────────────────│   panneau principal  │
//   │ entrées du mode  │   (View courante)    │
//   └──────────────── footer ─────────────────┘
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones (vertical puis horizontal)
// 3. Widgets : Block, Paragraph, List, LineGauge
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::analytics::monte_carlo::{MAX_DAYS, MAX_SIMULATIONS, MIN_DAYS, MIN_SIMULATIONS};
use crate::app::{App, Focus, SchemeListState, Status};
use crate::ui::panels::render_view;
use crate::views::Mode;

/// Largeur de la colonne de gauche
const SIDEBAR_WIDTH: u16 = 46;

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);

    render_sidebar(frame, app, body[0]);
    render_view(frame, &app.view, app.view_scroll, body[1]);

    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Zynovo ")
        .title_alignment(Alignment::Center);

    let line = if app.is_loading_data() {
        Line::from(Span::styled(
            format!(
                "{} {}",
                app.spinner(),
                app.loading_message.as_deref().unwrap_or("Loading...")
            ),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            "Indian Mutual Fund Dashboard",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Sidebar : menu + entrées du mode
// ============================================================================

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Mode::ALL.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    render_menu(frame, app, chunks[0]);

    if app.mode.needs_amc() {
        render_amc_input(frame, app, chunks[1]);
    } else if app.mode.has_simulation() {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(6)])
            .split(chunks[1]);
        render_scheme_picker(frame, app, parts[0]);
        render_sliders(frame, app, parts[1]);
    } else if app.mode.needs_scheme() {
        render_scheme_picker(frame, app, chunks[1]);
    } else {
        render_hint(frame, chunks[1], "Average AUM has no input");
    }
}

/// Bordure jaune pour le composant qui a le focus
fn focus_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    }
}

fn render_menu(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = Mode::ALL
        .iter()
        .enumerate()
        .map(|(index, mode)| {
            let marker = if *mode == app.mode { "● " } else { "  " };
            let mut style = Style::default().fg(Color::White);
            if index == app.menu_index && app.focus == Focus::Menu {
                style = style.add_modifier(Modifier::BOLD).add_modifier(Modifier::REVERSED);
            } else if index == app.menu_index {
                style = style.add_modifier(Modifier::BOLD);
            }
            ListItem::new(format!("{}{}", marker, mode.label())).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == Focus::Menu))
            .title(" Select Mode "),
    );

    frame.render_widget(list, area);
}

fn render_amc_input(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.focus == Focus::AmcInput;

    let mut input = vec![
        Span::styled(
            "AMC: ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.amc_input.as_str(), Style::default().fg(Color::White)),
    ];
    if active {
        input.push(Span::styled(
            "█", // Curseur
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    let text = vec![
        Line::from(input),
        Line::from(""),
        Line::from(Span::styled(
            "e.g. Axis, HDFC, Nippon India",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(active))
            .title(" Enter AMC name "),
    );

    frame.render_widget(paragraph, area);
}

/// Liste des fonds avec filtre et coches
///
/// CONCEPT RATATUI : ListState
/// - render_stateful_widget fait défiler la liste pour garder
///   l'élément sélectionné visible
fn render_scheme_picker(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    // Ligne de filtre
    let mut filter = vec![
        Span::styled("/ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(app.scheme_filter.as_str(), Style::default().fg(Color::White)),
    ];
    if app.focus == Focus::SchemeFilter {
        filter.push(Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    let filter_widget = Paragraph::new(Line::from(filter)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == Focus::SchemeFilter))
            .title(" Search "),
    );
    frame.render_widget(filter_widget, chunks[0]);

    let schemes = app.filtered_schemes();
    let title = if app.mode.is_multi_select() {
        format!(" Schemes ({} selected) ", app.selected_codes.len())
    } else {
        format!(" Schemes ({}) ", schemes.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(app.focus == Focus::SchemePicker))
        .title(title);

    if schemes.is_empty() {
        let message = match app.scheme_list {
            SchemeListState::Loading => "Loading scheme list...",
            SchemeListState::Failed => "Scheme list unavailable (press r to retry)",
            SchemeListState::Loaded => "No schemes found",
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Gray),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    let name_width = SIDEBAR_WIDTH.saturating_sub(8) as usize;
    let items: Vec<ListItem> = schemes
        .iter()
        .map(|scheme| {
            let check = if !app.mode.is_multi_select() {
                ""
            } else if app.is_selected(&scheme.code) {
                "[x] "
            } else {
                "[ ] "
            };
            let style = if app.is_selected(&scheme.code) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{}{}", check, scheme.short_name(name_width))).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(app.scheme_cursor.min(schemes.len() - 1)));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

/// Deux jauges : nombre de simulations et horizon
fn render_sliders(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Simulation ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(inner);

    let params = &app.sim_params;
    render_slider(
        frame,
        rows[0],
        format!("Simulations {} [h/l]", params.num_simulations),
        slider_ratio(params.num_simulations, MIN_SIMULATIONS, MAX_SIMULATIONS),
    );
    render_slider(
        frame,
        rows[1],
        format!("Days {} [H/L]", params.num_days),
        slider_ratio(params.num_days, MIN_DAYS, MAX_DAYS),
    );
}

fn render_slider(frame: &mut Frame, area: Rect, label: String, ratio: f64) {
    let gauge = LineGauge::default()
        .gauge_style(Style::default().fg(Color::Yellow))
        .line_set(symbols::line::THICK)
        .label(label)
        .ratio(ratio);
    frame.render_widget(gauge, area);
}

/// Position d'une valeur dans [min, max], entre 0 et 1
fn slider_ratio(value: usize, min: usize, max: usize) -> f64 {
    if max <= min {
        return 0.0;
    }
    let value = value.clamp(min, max);
    (value - min) as f64 / (max - min) as f64
}

fn render_hint(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : statut ou raccourcis
// ============================================================================

fn key_span(key: &str) -> Span<'static> {
    Span::styled(
        key.to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )
}

/// Raccourcis valables pour le composant actif
fn shortcuts(app: &App) -> Line<'static> {
    let mut spans = match app.focus {
        Focus::Menu => vec![
            key_span("[↑↓ / j k]"),
            Span::raw(" Navigate  "),
            key_span("[Enter]"),
            Span::raw(" Select mode  "),
        ],
        Focus::AmcInput => vec![
            key_span("[Enter]"),
            Span::raw(" Search  "),
            key_span("[ESC]"),
            Span::raw(" Menu"),
        ],
        Focus::SchemeFilter => vec![
            key_span("[Enter]"),
            Span::raw(" Keep filter  "),
            key_span("[ESC]"),
            Span::raw(" Clear filter"),
        ],
        Focus::SchemePicker => {
            let mut spans = vec![
                key_span("[↑↓]"),
                Span::raw(" Scheme  "),
                key_span("[/]"),
                Span::raw(" Search  "),
            ];
            if app.mode.is_multi_select() {
                spans.push(key_span("[Space]"));
                spans.push(Span::raw(" Toggle  "));
                spans.push(key_span("[Enter]"));
                spans.push(Span::raw(" Compare  "));
            } else {
                spans.push(key_span("[Enter]"));
                spans.push(Span::raw(" Show  "));
            }
            if app.mode.has_simulation() {
                spans.push(key_span("[h/l H/L]"));
                spans.push(Span::raw(" Sliders  "));
            }
            spans.push(key_span("[ESC]"));
            spans.push(Span::raw(" Menu  "));
            spans
        }
    };

    if !app.is_typing() {
        spans.push(key_span("[PgUp/PgDn]"));
        spans.push(Span::raw(" Scroll  "));
        spans.push(key_span("[r]"));
        spans.push(Span::raw(" Rerun  "));
        spans.push(key_span("[q]"));
        spans.push(Span::raw(" Quit"));
    }

    Line::from(spans)
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        match &app.status {
            Some(Status::Error(message)) => Line::from(Span::styled(
                format!("✗ {}", message),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Some(Status::Info(message)) => {
                let mut line = shortcuts(app);
                line.spans.insert(0, Span::styled(
                    format!("{}  │  ", message),
                    Style::default().fg(Color::Green),
                ));
                line
            }
            None => shortcuts(app),
        }
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
