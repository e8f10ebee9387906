pub mod charts;
pub mod command_completion;
pub mod dialogs;
mod form;
pub mod help;
mod kanban;
mod list;
mod people;
mod statusbar;

use crate::app::{App, Mode, Notification};
use crate::i18n::{t, Language};
use crate::views::auth::AuthView;
use crate::views::task_form::{TaskFormMode, TaskFormView};
use crate::views::{Load, View};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Draw the whole screen from app state
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(0),    // view
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    let lang = app.config.language;
    render_title_bar(f, chunks[0], app, lang);
    render_view(f, chunks[1], app, lang);
    statusbar::render(f, chunks[2], app);

    match app.mode {
        Mode::Help => help::render(f, f.area()),
        Mode::Command => command_completion::render(f, chunks[1], app),
        Mode::Confirm => dialogs::render_confirm(f, t(lang, "task_details"), t(lang, "confirm_delete")),
        Mode::Normal | Mode::Insert => {}
    }

    if let Some(ref notification) = app.notification {
        render_notification(f, f.area(), notification);
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App, lang: Language) {
    let title = app
        .route
        .as_ref()
        .map(|route| t(lang, route.title_key()))
        .unwrap_or("taskdesk");
    let line = Line::from(vec![
        Span::styled(
            " taskdesk ",
            Style::default()
                .fg(Color::Black)
                .bg(dialogs::NORD_FROST)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", title), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" ? help  : command ", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_view(f: &mut Frame, area: Rect, app: &App, lang: Language) {
    let editing = app.mode == Mode::Insert;
    let title = app
        .route
        .as_ref()
        .map(|route| t(lang, route.title_key()))
        .unwrap_or("");

    match &app.view {
        View::Splash => render_message(f, area, t(lang, "loading"), Color::Gray),
        View::Unauthorized => {
            render_message(f, area, t(lang, "unauthorized_message"), Color::Red)
        }
        View::Auth(view) => render_auth(f, area, view, editing, lang),
        View::Board(view) => kanban::render(f, area, title, view, lang),
        View::TaskList(view) => list::render(f, area, title, view, lang),
        View::TaskForm(view) => render_task_form(f, area, view, editing, lang),
        View::Employees(view) => people::render_employees(f, area, view, lang),
        View::AddEmployee(view) => people::render_add_employee(f, area, view, editing, lang),
        View::EmployeeProfile(view) => people::render_employee_profile(f, area, view, lang),
        View::Profile(view) => people::render_profile(f, area, view, editing, lang),
        View::Stats(view) => charts::render(f, area, view, lang),
    }
}

fn render_message(f: &mut Frame, area: Rect, message: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(ratatui::widgets::BorderType::Rounded);
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color))
        .block(block);
    f.render_widget(paragraph, area);
}

fn render_auth(f: &mut Frame, area: Rect, view: &AuthView, editing: bool, lang: Language) {
    let popup = dialogs::centered_rect(60, 80, area);
    let block = Block::default()
        .title(format!(" {} ", t(lang, view.kind.title_key())))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(dialogs::NORD_FROST))
        .border_type(ratatui::widgets::BorderType::Rounded);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);
    form::render(f, chunks[0], &view.form, editing && !view.submitting, lang);

    let footer = match (&view.error, view.submitting) {
        (_, true) => Span::styled(t(lang, "loading"), Style::default().fg(Color::Gray)),
        (Some(error), false) => Span::styled(error.as_str(), Style::default().fg(Color::Red)),
        (None, false) => Span::styled("Enter submit  Esc back", Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(Paragraph::new(Line::from(footer)), chunks[1]);
}

fn render_task_form(f: &mut Frame, area: Rect, view: &TaskFormView, editing: bool, lang: Language) {
    let title = match view.mode {
        TaskFormMode::Create => t(lang, "create_task"),
        TaskFormMode::Edit(_) => t(lang, "task_details"),
    };
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .border_type(ratatui::widgets::BorderType::Rounded);

    match (&view.load, &view.form) {
        (Load::Failed(message), _) => {
            let paragraph = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block);
            f.render_widget(paragraph, area);
        }
        (_, Some(form)) => {
            let inner = block.inner(area);
            f.render_widget(block, area);
            form::render(f, inner, form, editing && !view.submitting, lang);
        }
        _ => f.render_widget(Paragraph::new(t(lang, "loading")).block(block), area),
    }
}

fn render_notification(f: &mut Frame, area: Rect, notification: &Notification) {
    use crate::app::NotificationLevel;

    let notification_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 3.min(area.height),
    };

    let (bg_color, fg_color, prefix) = match notification.level {
        NotificationLevel::Info => (Color::Blue, Color::White, "ℹ"),
        NotificationLevel::Success => (Color::Green, Color::White, "✓"),
        NotificationLevel::Warning => (Color::Yellow, Color::Black, "⚠"),
        NotificationLevel::Error => (Color::Red, Color::White, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(
            format!(" {} ", prefix),
            Style::default().fg(fg_color).bg(bg_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(notification.message.as_str(), Style::default().fg(fg_color)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(bg_color))
        .style(Style::default().bg(bg_color));

    f.render_widget(Paragraph::new(content).block(block), notification_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{self, FakeBackend};
    use crate::app::tests::{app_with, settle, signed_in};
    use crate::models::{Role, TaskStatus};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_login_screen() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with(FakeBackend::new(), &dir);
        app.start();
        settle(&mut app).await;

        let text = screen(&app);
        assert!(text.contains("Sign in"));
        assert!(text.contains("Password"));
    }

    #[tokio::test]
    async fn test_board_shows_columns_and_cards() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new()
            .with_tasks(vec![fake::task(1, TaskStatus::InProgress, Some(7))])
            .with_employees(vec![fake::user(7, "alice", Role::Employee)]);
        let (app, _) = signed_in(backend, Role::Employee, &dir).await;

        let text = screen(&app);
        assert!(text.contains("To do (0)"));
        assert!(text.contains("In progress (1)"));
        assert!(text.contains("@alice"));
    }

    #[tokio::test]
    async fn test_unauthorized_message() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = signed_in(FakeBackend::new(), Role::Employee, &dir).await;
        app.navigate(crate::guard::Route::Employees);
        settle(&mut app).await;

        assert!(screen(&app).contains("You do not have permission"));
    }
}
