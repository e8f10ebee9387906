use crate::i18n::{t, Language};
use crate::views::stats::{ChartData, StatPanel, StatsView};
use crate::views::Load;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline},
    Frame,
};

use super::dialogs::{NORD_FROST, NORD_GREEN, NORD_MUTED};

/// Stats dashboard: three panels on top, two below
pub fn render(f: &mut Frame, area: Rect, view: &StatsView, lang: Language) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2); 2])
        .split(rows[1]);

    let cells = top.iter().chain(bottom.iter());
    for (idx, (panel, cell)) in view.panels.iter().zip(cells).enumerate() {
        render_panel(f, *cell, panel, idx == view.selected, lang);
    }
}

fn render_panel(f: &mut Frame, area: Rect, panel: &StatPanel, focused: bool, lang: Language) {
    let border = if focused { Color::White } else { Color::DarkGray };
    let block = Block::default()
        .title(format!(" {} ", t(lang, panel.kind.title_key())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(ratatui::widgets::BorderType::Rounded);

    if let Load::Failed(message) = &panel.data {
        f.render_widget(
            Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block),
            area,
        );
        return;
    }
    if panel.data.is_loading() {
        f.render_widget(Paragraph::new(t(lang, "loading")).block(block), area);
        return;
    }

    match panel.chart(lang) {
        None => {
            f.render_widget(
                Paragraph::new(t(lang, "no_data"))
                    .style(Style::default().fg(Color::Gray))
                    .block(block),
                area,
            );
        }
        Some(chart) if chart.kind.is_series() => render_series(f, area, block, &chart),
        Some(chart) => render_bars(f, area, block, &chart),
    }
}

fn render_bars(f: &mut Frame, area: Rect, block: Block, chart: &ChartData) {
    let bars: Vec<Bar> = chart
        .points
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .label(Line::from(label.as_str()))
                .value(*value)
                .style(Style::default().fg(NORD_FROST))
                .value_style(Style::default().fg(Color::Black).bg(NORD_FROST))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let count = chart.points.len().max(1) as u16;
    let bar_width = (inner_width / count).saturating_sub(1).clamp(1, 12);

    let barchart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(chart.max().max(1));
    f.render_widget(barchart, area);
}

fn render_series(f: &mut Frame, area: Rect, block: Block, chart: &ChartData) {
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    // the newest points win when there are more than columns
    let width = chunks[0].width as usize;
    let skip = chart.points.len().saturating_sub(width);
    let shown = &chart.points[skip..];
    let values: Vec<u64> = shown.iter().map(|(_, v)| *v).collect();

    let sparkline = Sparkline::default()
        .data(&values)
        .max(chart.max().max(1))
        .style(Style::default().fg(NORD_GREEN));
    f.render_widget(sparkline, chunks[0]);

    let first = shown.first().map(|(k, _)| k.as_str()).unwrap_or("");
    let last = shown.last().map(|(k, _)| k.as_str()).unwrap_or("");
    let legend = Line::from(vec![
        Span::styled(first, Style::default().fg(NORD_MUTED)),
        Span::raw(" … "),
        Span::styled(last, Style::default().fg(NORD_MUTED)),
        Span::styled(
            format!("  max {}", chart.max()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(legend), chunks[1]);
}
