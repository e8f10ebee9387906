use crate::i18n::{t, Language};
use crate::models::{Priority, Task, TaskStatus};
use crate::views::board::BoardView;
use crate::views::Load;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const CARD_WORDS: usize = 10;

/// Four-column board, one column per status
pub fn render(f: &mut Frame, area: Rect, title: &str, board: &BoardView, lang: Language) {
    let total = board.data.ready().map(|d| d.tasks.len()).unwrap_or(0);
    let done = board.column_tasks(TaskStatus::Completed).len()
        + board.column_tasks(TaskStatus::Closed).len();

    let block = Block::default()
        .title(format!(" {} ({}/{}) ", title, done, total))
        .title_alignment(ratatui::layout::Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .border_type(ratatui::widgets::BorderType::Rounded);

    let inner = block.inner(area);
    f.render_widget(block, area);

    match &board.data {
        Load::Loading => {
            f.render_widget(Paragraph::new(t(lang, "loading")).style(Style::default().fg(Color::Gray)), inner);
            return;
        }
        Load::Failed(message) => {
            f.render_widget(Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red)), inner);
            return;
        }
        Load::Ready(_) => {}
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(inner);

    for (idx, status) in TaskStatus::ALL.iter().enumerate() {
        render_column(f, columns[idx], *status, board, lang);
    }
}

fn render_column(f: &mut Frame, area: Rect, status: TaskStatus, board: &BoardView, lang: Language) {
    let column_idx = status.column();
    let is_column_focused = board.column == column_idx;
    let tasks = board.column_tasks(status);
    let selected = board.selected_row(column_idx);

    let (border_color, title_style) = if is_column_focused {
        (Color::White, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    } else {
        (Color::DarkGray, Style::default().fg(Color::Gray))
    };

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| card(task, is_column_focused && i == selected, board, lang))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" {} ({}) ", t(lang, status.label_key()), tasks.len()))
            .title_alignment(ratatui::layout::Alignment::Center)
            .title_style(title_style)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .border_type(ratatui::widgets::BorderType::Rounded),
    );

    f.render_widget(list, area);
}

fn card<'a>(task: &'a Task, is_selected: bool, board: &BoardView, lang: Language) -> ListItem<'a> {
    let style = if is_selected {
        Style::default()
            .bg(Color::Rgb(41, 98, 218))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let selection_indicator = if is_selected {
        Span::styled("▶ ", Style::default().fg(Color::White))
    } else {
        Span::raw("  ")
    };

    // in flight: the status shown is not confirmed yet
    let moving = if board.is_moving(task.id) {
        Span::styled(" ⟳", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };

    let dim = Style::default().fg(Color::Gray);
    let mut lines = vec![Line::from(vec![
        Span::raw(" "),
        selection_indicator,
        priority_dot(task.priority),
        Span::raw(task.title.as_str()),
        moving,
    ])];

    let summary = task.short_description(CARD_WORDS);
    if !summary.is_empty() {
        lines.push(Line::from(Span::styled(format!("     {}", summary), dim)));
    }
    lines.push(Line::from(Span::styled(
        format!("     @{}", board.assignee_label(task, lang)),
        dim,
    )));

    ListItem::new(lines).style(style)
}

pub fn priority_dot(priority: Priority) -> Span<'static> {
    let color = match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Blue,
    };
    Span::styled("● ", Style::default().fg(color))
}
