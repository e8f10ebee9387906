use crate::i18n::{t, Language};
use crate::models::User;
use crate::views::people::{AddEmployeeView, EmployeeProfileView, EmployeesView, ProfileMode, ProfileView};
use crate::views::Load;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use super::dialogs::{NORD_FROST, NORD_MUTED};
use super::form;

fn frame_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .border_type(ratatui::widgets::BorderType::Rounded)
}

/// Shared loading and error rendering; returns the value once it is ready
fn ready_or_placeholder<'a, T>(
    f: &mut Frame,
    area: Rect,
    load: &'a Load<T>,
    block: Block,
    lang: Language,
) -> Option<&'a T> {
    match load {
        Load::Ready(value) => Some(value),
        Load::Loading => {
            f.render_widget(Paragraph::new(t(lang, "loading")).block(block), area);
            None
        }
        Load::Failed(message) => {
            f.render_widget(
                Paragraph::new(message.as_str())
                    .style(Style::default().fg(Color::Red))
                    .block(block),
                area,
            );
            None
        }
    }
}

pub fn render_employees(f: &mut Frame, area: Rect, view: &EmployeesView, lang: Language) {
    let block = frame_block(t(lang, "employees"));
    let Some(summaries) = ready_or_placeholder(f, area, &view.summaries, block.clone(), lang) else {
        return;
    };

    if summaries.is_empty() {
        f.render_widget(
            Paragraph::new(t(lang, "no_employees"))
                .style(Style::default().fg(Color::Gray))
                .block(block),
            area,
        );
        return;
    }

    let rows: Vec<Row> = summaries
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let style = if i == view.selected {
                Style::default()
                    .bg(Color::Rgb(41, 98, 218))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                s.username.clone(),
                s.email.clone(),
                s.total_tasks.to_string(),
                s.todo_tasks.to_string(),
                s.in_progress_tasks.to_string(),
                s.completed_tasks.to_string(),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec![
        t(lang, "username"),
        t(lang, "email"),
        t(lang, "total_tasks"),
        t(lang, "todo"),
        t(lang, "in_progress"),
        t(lang, "completed"),
    ])
    .style(Style::default().fg(NORD_FROST).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(32),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
        ],
    )
    .header(header)
    .block(block);
    f.render_widget(table, area);
}

pub fn render_add_employee(f: &mut Frame, area: Rect, view: &AddEmployeeView, editing: bool, lang: Language) {
    let block = frame_block(t(lang, "add_employee"));
    let inner = block.inner(area);
    f.render_widget(block, area);
    form::render(f, inner, &view.form, editing && !view.submitting, lang);
}

pub fn render_employee_profile(f: &mut Frame, area: Rect, view: &EmployeeProfileView, lang: Language) {
    let block = frame_block(t(lang, "employee_profile"));
    if let Some(user) = ready_or_placeholder(f, area, &view.user, block.clone(), lang) {
        f.render_widget(Paragraph::new(user_lines(user, lang)).block(block), area);
    }
}

pub fn render_profile(f: &mut Frame, area: Rect, view: &ProfileView, editing: bool, lang: Language) {
    let block = frame_block(t(lang, "profile"));
    let Some(user) = ready_or_placeholder(f, area, &view.user, block.clone(), lang) else {
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(inner);
    f.render_widget(Paragraph::new(user_lines(user, lang)), chunks[0]);

    let editing = editing && !view.submitting;
    match view.mode {
        ProfileMode::Viewing => {
            let hint = Line::from(vec![
                Span::styled(" e ", Style::default().fg(NORD_MUTED)),
                Span::raw("edit   "),
                Span::styled(" p ", Style::default().fg(NORD_MUTED)),
                Span::raw(t(lang, "new_password")),
            ]);
            f.render_widget(Paragraph::new(hint), chunks[1]);
        }
        ProfileMode::Editing => form::render(f, chunks[1], &view.edit_form, editing, lang),
        ProfileMode::ChangingPassword => {
            form::render(f, chunks[1], &view.password_form, editing, lang)
        }
    }
}

fn user_lines(user: &User, lang: Language) -> Vec<Line<'static>> {
    let label = |key: &'static str| Span::styled(format!("{:<14}", t(lang, key)), Style::default().fg(NORD_MUTED));
    let mut lines = vec![
        Line::from(vec![label("username"), Span::raw(user.username.clone())]),
        Line::from(vec![label("email"), Span::raw(user.email.clone())]),
    ];
    if let Some(name) = user.full_name() {
        lines.push(Line::from(vec![label("full_name"), Span::raw(name)]));
    }
    if let Some(role) = user.role {
        lines.push(Line::from(vec![label("role"), Span::raw(role.as_str().to_string())]));
    }
    lines
}
