use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

// Nord palette
pub const NORD_BG: Color = Color::Rgb(46, 52, 64);
pub const NORD_FG: Color = Color::Rgb(216, 222, 233);
pub const NORD_FROST: Color = Color::Rgb(136, 192, 208);
pub const NORD_MUTED: Color = Color::Rgb(129, 161, 193);
pub const NORD_RED: Color = Color::Rgb(191, 97, 106);
pub const NORD_YELLOW: Color = Color::Rgb(235, 203, 139);
pub const NORD_GREEN: Color = Color::Rgb(163, 190, 140);

pub fn render_backdrop(f: &mut Frame, area: Rect) {
    let block = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    f.render_widget(block, area);
}

/// Yes/no prompt over the current view
pub fn render_confirm(f: &mut Frame, title: &str, message: &str) {
    render_backdrop(f, f.area());
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(NORD_YELLOW))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(NORD_BG));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let message_text = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(NORD_FG));
    f.render_widget(message_text, chunks[0]);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[1]);

    let no_button = Paragraph::new("[ n ]")
        .style(Style::default().bg(NORD_RED).fg(NORD_BG).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(no_button, buttons[1]);

    let yes_button = Paragraph::new("[ y ]")
        .style(Style::default().fg(NORD_GREEN).add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
    f.render_widget(yes_button, buttons[2]);
}

/// Centered sub-rectangle taking the given percentages of `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 50, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 25);
        assert_eq!(inner.y, 10);
    }
}
