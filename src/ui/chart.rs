// ============================================================================
// Chart - Rendu des graphiques
// ============================================================================
// Dessine les LineChart préparés par le module views :
// historique des NAV, comparaison, rendements, trajectoires Monte Carlo,
// et les barres de performance mensuelle.
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::views::{Bar, LineChart};

/// Couleurs des séries, dans l'ordre
const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::LightRed,
    Color::LightBlue,
    Color::White,
    Color::LightGreen,
];

/// Au-delà, la légende prend toute la place
const MAX_LEGEND_ENTRIES: usize = 8;

pub fn series_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

// ============================================================================
// Graphique ligne
// ============================================================================

/// Dessine un LineChart (une couleur par série)
///
/// CONCEPT RUST : Lifetimes implicites
/// - Dataset emprunte les points de `chart` : `chart` doit vivre
///   au moins jusqu'à render_widget, ce qui est le cas ici
pub fn render_line_chart(frame: &mut Frame, chart: &LineChart, area: Rect) {
    if chart.series.iter().all(|s| s.points.is_empty()) {
        render_no_data(frame, area, &chart.title, "No data to plot");
        return;
    }

    // Beaucoup de trajectoires : marqueur plus fin, pas de légende
    let crowded = chart.series.len() > MAX_LEGEND_ENTRIES;
    let marker = if crowded {
        symbols::Marker::Braille
    } else {
        symbols::Marker::Dot
    };

    let datasets: Vec<Dataset> = chart
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let dataset = Dataset::default()
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(i)))
                .data(&series.points);
            if crowded {
                dataset
            } else {
                dataset.name(series.name.clone())
            }
        })
        .collect();

    let x_axis = Axis::default()
        .title(chart.x_title.clone())
        .style(Style::default().fg(Color::Gray))
        .bounds(chart.x_bounds)
        .labels(chart.x_labels.iter().cloned().map(Span::raw).collect());

    let y_axis = Axis::default()
        .title(chart.y_title.clone())
        .style(Style::default().fg(Color::Gray))
        .bounds(chart.y_bounds)
        .labels(chart.y_labels.iter().cloned().map(Span::raw).collect());

    let mut widget = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", chart.title)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    if crowded {
        widget = widget.legend_position(None);
    }

    frame.render_widget(widget, area);
}

// ============================================================================
// Barres de performance mensuelle
// ============================================================================

/// Une barre par mois, dessinée avec le widget Chart
///
/// CONCEPT RATATUI : une barre = un Dataset de deux points
/// - GraphType::Line relie (x, 0) à (x, valeur) : segment vertical
/// - Contrairement au widget BarChart, accepte des valeurs négatives
/// - Vert au-dessus de zéro, rouge en dessous
pub fn render_bars(frame: &mut Frame, title: &str, bars: &[Bar], area: Rect) {
    if bars.is_empty() {
        render_no_data(frame, area, title, "No data to plot");
        return;
    }

    let segments = bar_segments(bars);

    let (min, max) = bars
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), bar| (lo.min(bar.value), hi.max(bar.value)));
    let margin = ((max - min) * 0.1).max(1e-6);
    let y_bounds = [min - margin, max + margin];

    // Les Dataset empruntent leurs points : `segments` doit vivre jusqu'au rendu
    let datasets: Vec<Dataset> = bars
        .iter()
        .zip(segments.iter())
        .map(|(bar, segment)| {
            Dataset::default()
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(bar_color(bar.value)))
                .data(segment)
        })
        .collect();

    let x_axis = Axis::default()
        .title("Month")
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, bars.len() as f64 + 1.0])
        .labels(month_axis_labels(bars));

    let y_axis = Axis::default()
        .title("Avg change")
        .style(Style::default().fg(Color::Gray))
        .bounds(y_bounds)
        .labels(vec![
            Span::raw(format!("{:.3}", y_bounds[0])),
            Span::raw("0"),
            Span::raw(format!("{:.3}", y_bounds[1])),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", title)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(None);

    frame.render_widget(chart, area);
}

/// Segment vertical de chaque barre, les mois étant placés en x = 1, 2, ...
fn bar_segments(bars: &[Bar]) -> Vec<[(f64, f64); 2]> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let x = i as f64 + 1.0;
            [(x, 0.0), (x, bar.value)]
        })
        .collect()
}

fn bar_color(value: f64) -> Color {
    if value < 0.0 {
        Color::Red
    } else {
        Color::Green
    }
}

/// Labels du premier et du dernier mois (ratatui répartit les labels)
fn month_axis_labels(bars: &[Bar]) -> Vec<Span<'static>> {
    let first = bars.first().map(|b| b.label.clone()).unwrap_or_default();
    let last = bars.last().map(|b| b.label.clone()).unwrap_or_default();
    vec![Span::raw(""), Span::raw(first), Span::raw(last), Span::raw("")]
}

// ============================================================================
// Helper : Message quand pas de données
// ============================================================================

fn render_no_data(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", title));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
