use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::dialogs::{NORD_FG, NORD_FROST, NORD_MUTED};
use crate::i18n::{t, Language};
use crate::views::form::{FieldKind, Form};

/// Draw a form field by field. `editing` shows the cursor in the focused one.
pub fn render(f: &mut Frame, area: Rect, form: &Form, editing: bool, lang: Language) {
    let heights: Vec<Constraint> = form
        .fields
        .iter()
        .map(|field| match field.kind {
            FieldKind::Multiline => Constraint::Length(5),
            _ => Constraint::Length(3),
        })
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(heights)
        .split(area);

    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focused;
        let border = match (focused, editing, field.editable) {
            (true, true, _) => Style::default().fg(NORD_FROST),
            (true, false, _) => Style::default().fg(Color::White),
            (false, _, false) => Style::default().fg(Color::DarkGray),
            _ => Style::default().fg(NORD_MUTED),
        };
        let mut title = format!(" {} ", t(lang, field.label));
        if field.required && field.editable {
            title.push_str("* ");
        }
        if !field.editable {
            title.push_str("(read-only) ");
        }

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border)
            .border_type(ratatui::widgets::BorderType::Rounded);

        let area = rows[idx];
        match &field.kind {
            FieldKind::Choice(_) => {
                let marker = if field.editable { "◀ " } else { "" };
                let tail = if field.editable { " ▶" } else { "" };
                let line = Line::from(vec![
                    Span::styled(marker, Style::default().fg(NORD_MUTED)),
                    Span::styled(field.display_value(), Style::default().fg(NORD_FG)),
                    Span::styled(tail, Style::default().fg(NORD_MUTED)),
                ]);
                f.render_widget(Paragraph::new(line).block(block), area);
            }
            _ if focused && editing => {
                let mut textarea = field.textarea().clone();
                textarea.set_block(block);
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
                f.render_widget(&textarea, area);
            }
            _ => {
                let style = if field.editable {
                    Style::default().fg(NORD_FG)
                } else {
                    Style::default().fg(Color::Gray)
                };
                f.render_widget(
                    Paragraph::new(field.display_value()).style(style).block(block),
                    area,
                );
            }
        }
    }
}
