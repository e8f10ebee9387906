//! `:` prompt with Helix-style completion
use crate::app::App;
use crate::input::CommandDef;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::dialogs::{NORD_BG, NORD_FROST};

const COLUMN_WIDTH: usize = 20;

/// Draw the prompt just above `area`'s bottom edge, candidates above it
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let input = app.command_input.as_str();
    // only the command word completes; arguments follow a space
    let word = input.split_whitespace().next().unwrap_or("");
    let matches = if input.contains(' ') {
        app.command_registry.find_exact(word).into_iter().collect()
    } else {
        app.command_registry.find_matches(word)
    };

    let input_height = 3u16.min(area.height);
    let input_area = Rect {
        x: area.x,
        y: area.y + area.height - input_height,
        width: area.width,
        height: input_height,
    };
    render_command_input(f, input_area, input);

    if matches.is_empty() {
        return;
    }

    let columns = (area.width as usize / COLUMN_WIDTH).clamp(1, 5);
    let rows = matches.len().div_ceil(columns).min(8) as u16;
    let list_height = rows.min(area.height.saturating_sub(input_height));
    let list_area = Rect {
        x: area.x,
        y: input_area.y.saturating_sub(list_height),
        width: area.width,
        height: list_height,
    };
    render_command_list(f, list_area, &matches, columns);

    let exact = matches
        .iter()
        .find(|cmd| cmd.name == word || cmd.aliases.contains(&word));
    if let Some(cmd) = exact.or(if matches.len() == 1 { matches.first() } else { None }) {
        render_command_detail(f, area, cmd);
    }
}

fn render_command_input(f: &mut Frame, area: Rect, input: &str) {
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" command ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(NORD_FROST))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(NORD_BG));

    let paragraph = Paragraph::new(Line::from(format!(":{}", input)))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .block(block);

    f.render_widget(paragraph, area);
}

/// Column-major grid; the first entry is what Tab completes to
fn render_command_list(f: &mut Frame, area: Rect, commands: &[&CommandDef], columns: usize) {
    f.render_widget(Clear, area);
    f.render_widget(
        Block::default().style(Style::default().bg(Color::Rgb(30, 30, 30))),
        area,
    );

    let max_rows = area.height as usize;
    let shown = &commands[..commands.len().min(columns * max_rows)];
    let rows = shown.len().div_ceil(columns);

    let mut lines = Vec::new();
    for row in 0..rows {
        let mut spans = Vec::new();
        for col in 0..columns {
            let idx = row + col * rows;
            let Some(cmd) = shown.get(idx) else {
                spans.push(Span::raw(" ".repeat(COLUMN_WIDTH)));
                continue;
            };
            let style = if idx == 0 {
                Style::default()
                    .bg(NORD_FROST)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(NORD_FROST)
            };
            spans.push(Span::styled(
                format!("{:<width$}", cmd.name, width = COLUMN_WIDTH - 1),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_command_detail(f: &mut Frame, area: Rect, cmd: &CommandDef) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 6.min(area.height);
    let popup_area = Rect {
        x: area.x + area.width.saturating_sub(popup_width) / 2,
        y: area.y + area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            cmd.name,
            Style::default().fg(NORD_FROST).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(cmd.description, Style::default().fg(Color::White))),
    ];
    if !cmd.aliases.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Aliases: {}", cmd.aliases.join(", ")),
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(NORD_FROST))
            .border_type(ratatui::widgets::BorderType::Rounded)
            .style(Style::default().bg(Color::Rgb(40, 40, 40))),
    );

    f.render_widget(paragraph, popup_area);
}
