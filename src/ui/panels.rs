// ============================================================================
// Panels - Rendu du panneau principal
// ============================================================================
// Dessine une View : message, tableau, graphiques, cartes de métriques.
// Aucun calcul ici, tout a été préparé par views::build_*.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table as TableWidget, Wrap},
    Frame,
};

use crate::ui::chart::{render_bars, render_line_chart};
use crate::views::{Metric, RiskView, Table, View};

/// Largeur maximale d'une colonne de tableau
const MAX_COLUMN_WIDTH: usize = 80;

/// Dessine la vue courante
///
/// `scroll` : nombre de lignes de tableau sautées (PageUp/PageDown)
pub fn render_view(frame: &mut Frame, view: &View, scroll: usize, area: Rect) {
    match view {
        View::Placeholder { title, message } => render_placeholder(frame, title, message, area),

        View::Table { title, table } => render_table(frame, title, table, scroll, area),

        View::History { title, table, chart } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            render_line_chart(frame, chart, chunks[0]);
            render_table(frame, title, table, scroll, chunks[1]);
        }

        View::Comparison { chart } => render_line_chart(frame, chart, area),

        View::Performance { title, bars, table } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
            render_bars(frame, title, bars, chunks[0]);
            render_table(frame, "Average daily NAV change by month", table, scroll, chunks[1]);
        }

        View::Risk(risk) => render_risk(frame, risk, area),
    }
}

// ============================================================================
// Message
// ============================================================================

fn render_placeholder(frame: &mut Frame, title: &str, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tableau
// ============================================================================

/// CONCEPT RATATUI : Table widget
/// - Row : une ligne de cellules
/// - widths : contrainte par colonne (obligatoire depuis ratatui 0.26)
/// - Seules les lignes visibles sont construites (skip/take)
fn render_table(frame: &mut Frame, title: &str, table: &Table, scroll: usize, area: Rect) {
    let visible = area.height.saturating_sub(3) as usize;
    let offset = scroll.min(table.len().saturating_sub(1));

    let header = Row::new(table.headers.iter().map(|h| Cell::from(h.clone())))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = table
        .rows
        .iter()
        .skip(offset)
        .take(visible)
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.clone()))))
        .collect();

    let title = if table.len() > visible {
        format!(
            " {} [{}-{} of {}] ",
            title,
            offset + 1,
            (offset + visible).min(table.len()),
            table.len()
        )
    } else {
        format!(" {} ", title)
    };

    let widget = TableWidget::new(rows, column_widths(table))
        .header(header)
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        );

    frame.render_widget(widget, area);
}

/// Largeur de chaque colonne = plus long contenu ; la dernière prend le reste
fn column_widths(table: &Table) -> Vec<Constraint> {
    let columns = table.headers.len();
    (0..columns)
        .map(|col| {
            if col + 1 == columns {
                return Constraint::Min(0);
            }
            let width = table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .chain(table.headers.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH);
            Constraint::Length(width as u16)
        })
        .collect()
}

// ============================================================================
// Risk & Volatility
// ============================================================================

fn render_risk(frame: &mut Frame, risk: &RiskView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Métriques
            Constraint::Min(8),    // Graphiques
            Constraint::Length(3), // Statistiques de simulation
        ])
        .split(area);

    render_metric_cards(frame, &risk.metrics, chunks[0]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_line_chart(frame, &risk.returns_chart, charts[0]);
    render_line_chart(frame, &risk.simulation_chart, charts[1]);

    render_metric_cards(frame, &risk.simulation_stats, chunks[2]);
}

/// Une carte par métrique, sur une ligne
pub fn render_metric_cards(frame: &mut Frame, metrics: &[Metric], area: Rect) {
    if metrics.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = metrics
        .iter()
        .map(|_| Constraint::Ratio(1, metrics.len() as u32))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (metric, cell) in metrics.iter().zip(cells.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            metric.value.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    format!(" {} ", metric.label),
                    Style::default().fg(Color::Cyan),
                )),
        );
        frame.render_widget(card, *cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::analytics::SimulationParams;
    use crate::models::NavHistory;
    use crate::views::build_risk;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer.get(x, y).symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_column_widths() {
        let mut table = Table::new(&["Scheme Name", "Scheme Code"]);
        table.push(vec!["Axis Bluechip Fund".into(), "120465".into()]);

        assert_eq!(
            column_widths(&table),
            vec![Constraint::Length(18), Constraint::Min(0)]
        );
    }

    #[test]
    fn test_render_placeholder_and_table() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();

        let placeholder = View::placeholder("Average AUM", "No data found");
        terminal
            .draw(|frame| render_view(frame, &placeholder, 0, frame.size()))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No data found"));

        let mut table = Table::new(&["Fund Name", "Total AUM"]);
        for i in 0..30 {
            table.push(vec![format!("Fund {}", i), format!("{}.00", i)]);
        }
        let view = View::Table {
            title: "Average AUM".to_string(),
            table,
        };
        terminal
            .draw(|frame| render_view(frame, &view, 5, frame.size()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Fund 5"));
        assert!(text.contains("of 30"));
    }

    #[test]
    fn test_render_risk_view() {
        let history = NavHistory::from_raw(
            "1".to_string(),
            "Small Cap Fund".to_string(),
            vec![
                ("01-01-2024", "100"),
                ("02-01-2024", "101"),
                ("03-01-2024", "99"),
                ("04-01-2024", "102"),
            ],
        );
        let params = SimulationParams {
            num_simulations: 100,
            num_days: 30,
            seed: Some(7),
        };
        let view = build_risk(&history, &params, 0.06);

        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|frame| render_view(frame, &view, 0, frame.size()))
            .unwrap();

        assert!(buffer_text(&terminal).contains("Annualised Volatility"));
    }
}
