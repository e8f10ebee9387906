use crate::i18n::{t, Language};
use crate::views::task_list::TaskListView;
use crate::views::Load;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use super::dialogs::{NORD_FROST, NORD_MUTED};
use super::kanban::priority_dot;

/// Paginated task table with the search box and filter line on top
pub fn render(f: &mut Frame, area: Rect, title: &str, view: &TaskListView, lang: Language) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_search(f, chunks[0], view, lang);
    render_filters(f, chunks[1], view, lang);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .border_type(ratatui::widgets::BorderType::Rounded);

    match &view.data {
        Load::Loading => {
            f.render_widget(Paragraph::new(t(lang, "loading")).block(block), chunks[2]);
            return;
        }
        Load::Failed(message) => {
            f.render_widget(
                Paragraph::new(message.as_str())
                    .style(Style::default().fg(Color::Red))
                    .block(block),
                chunks[2],
            );
            return;
        }
        Load::Ready(_) => {}
    }

    let items = view.page_items();
    if items.is_empty() {
        f.render_widget(
            Paragraph::new(t(lang, "no_tasks"))
                .style(Style::default().fg(Color::Gray))
                .block(block),
            chunks[2],
        );
    } else {
        let employees = view
            .data
            .ready()
            .map(|d| d.employees.as_slice())
            .unwrap_or(&[]);
        let rows: Vec<Row> = items
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let style = if i == view.selected {
                    Style::default()
                        .bg(Color::Rgb(41, 98, 218))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let assignee = crate::models::username_of(employees, task.assigned_employee_id)
                    .unwrap_or_else(|| t(lang, "unassigned"))
                    .to_string();
                let deadline = task
                    .deadline
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                Row::new(vec![
                    Line::from(vec![priority_dot(task.priority), Span::raw(task.title.clone())]),
                    Line::from(t(lang, task.status.label_key())),
                    Line::from(deadline),
                    Line::from(assignee),
                ])
                .style(style)
            })
            .collect();

        let header = Row::new(vec![
            t(lang, "title"),
            t(lang, "status"),
            t(lang, "deadline"),
            t(lang, "assigned_employee"),
        ])
        .style(Style::default().fg(NORD_FROST).add_modifier(Modifier::BOLD));

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(15),
                Constraint::Percentage(25),
            ],
        )
        .header(header)
        .block(block);
        f.render_widget(table, chunks[2]);
    }

    let pager = format!(
        " {} {}/{}  ({}) ",
        t(lang, "page"),
        view.page + 1,
        view.page_count().max(1),
        view.filtered().len()
    );
    f.render_widget(
        Paragraph::new(pager)
            .alignment(ratatui::layout::Alignment::Right)
            .style(Style::default().fg(NORD_MUTED)),
        chunks[3],
    );
}

fn render_search(f: &mut Frame, area: Rect, view: &TaskListView, lang: Language) {
    let border = if view.searching {
        Style::default().fg(NORD_FROST)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" / {} ", t(lang, "search")))
        .borders(Borders::ALL)
        .border_style(border)
        .border_type(ratatui::widgets::BorderType::Rounded);

    match view.search.fields.first() {
        Some(field) if view.searching => {
            let mut textarea = field.textarea().clone();
            textarea.set_block(block);
            textarea.set_cursor_line_style(Style::default());
            f.render_widget(&textarea, area);
        }
        _ => {
            f.render_widget(Paragraph::new(view.query()).block(block), area);
        }
    }
}

fn render_filters(f: &mut Frame, area: Rect, view: &TaskListView, lang: Language) {
    let status = view
        .status_filter
        .map(|s| t(lang, s.label_key()))
        .unwrap_or_else(|| t(lang, "all_statuses"));
    let priority = view
        .priority_filter
        .map(|p| t(lang, p.label_key()))
        .unwrap_or_else(|| t(lang, "all_priorities"));

    let key = Style::default().fg(NORD_MUTED);
    let line = Line::from(vec![
        Span::styled(" f ", key),
        Span::raw(status),
        Span::styled("   F ", key),
        Span::raw(priority),
        Span::styled("   x ", key),
        Span::raw("reset"),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
