use crate::app::{App, Mode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Helix-style status line: mode badge, pending keys, who is signed in
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let (mode_text, mode_color) = match app.mode {
        Mode::Normal => ("NORMAL", Color::Green),
        Mode::Insert => ("INSERT", Color::Cyan),
        Mode::Command => ("COMMAND", Color::Yellow),
        Mode::Help => ("HELP", Color::Blue),
        Mode::Confirm => ("CONFIRM", Color::Magenta),
    };

    let key_sequence = if app.key_buffer.is_empty() {
        String::new()
    } else {
        format!(" [{}]", app.key_buffer.iter().collect::<String>())
    };

    let busy = if app.in_flight() > 0 { " ⟳" } else { "" };

    let left = Line::from(vec![
        Span::styled(
            format!(" {} ", mode_text),
            Style::default()
                .fg(Color::Black)
                .bg(mode_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(key_sequence),
        Span::styled(busy, Style::default().fg(Color::Yellow)),
    ]);

    let who = match app.actor() {
        Some(session) => format!(
            "{} ({}) | {} ",
            session.display_name(),
            session.role.as_str(),
            app.config.language.code()
        ),
        None => format!("{} ", app.config.language.code()),
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(who.chars().count() as u16)])
        .split(area);

    let style = Style::default().bg(Color::Black);
    f.render_widget(Paragraph::new(left).style(style), chunks[0]);
    f.render_widget(
        Paragraph::new(who)
            .alignment(Alignment::Right)
            .style(style.fg(Color::Gray)),
        chunks[1],
    );
}
