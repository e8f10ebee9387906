use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::dialogs::{centered_rect, render_backdrop};

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const LEFT: &[Section] = &[
    (
        "Navigation",
        &[
            ("j k, ↓ ↑", "next / previous row"),
            ("h l, ← →", "previous / next column"),
            ("Enter", "open selection"),
            ("Esc, BS", "back"),
            ("q", "quit"),
            (":", "command mode"),
            ("?", "this help"),
        ],
    ),
    (
        "Board",
        &[
            ("H / L", "move card left / right"),
            ("1-4", "move card to column"),
            ("r", "reload"),
        ],
    ),
];

const MIDDLE: &[Section] = &[
    (
        "Go to",
        &[
            ("g h", "dashboard"),
            ("g t", "all tasks"),
            ("g m", "my tasks"),
            ("g n", "new task"),
            ("g e", "employees"),
            ("g a", "add employee"),
            ("g s", "statistics"),
            ("g p", "profile"),
            ("g q", "sign out"),
        ],
    ),
    (
        "Account",
        &[
            ("g l", "sign in"),
            ("g u", "sign up"),
            ("g f", "forgot password"),
        ],
    ),
];

const RIGHT: &[Section] = &[
    (
        "Editing",
        &[
            ("i, e", "edit"),
            ("n", "new item"),
            ("d", "delete task"),
            ("p", "change password"),
            ("Tab / S-Tab", "next / previous field"),
            ("← →", "cycle a choice"),
            ("Enter, C-s", "submit"),
            ("A-Enter", "newline in text"),
            ("Esc", "stop editing"),
        ],
    ),
    (
        "Task list",
        &[
            ("/", "search"),
            ("f / F", "status / priority filter"),
            ("x", "reset filters"),
            ("] / [", "next / previous page"),
        ],
    ),
];

fn section_lines(sections: &[Section]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (title, keys) in sections {
        lines.push(Line::from(Span::styled(
            *title,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        for (key, action) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<13}", key), Style::default().fg(Color::Cyan)),
                Span::raw(*action),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}

pub fn render(f: &mut Frame, area: Rect) {
    render_backdrop(f, area);

    let popup_area = centered_rect(80, 85, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Key bindings (any key closes) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(inner);

    for (sections, column) in [LEFT, MIDDLE, RIGHT].into_iter().zip(columns.iter()) {
        let paragraph = Paragraph::new(section_lines(sections)).wrap(Wrap { trim: false });
        f.render_widget(paragraph, *column);
    }
}
