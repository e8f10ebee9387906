use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode, MoveTarget, NotificationLevel};
use crate::guard::Route;
use crate::i18n::Language;
use crate::input::Command;
use crate::views::form::FormAction;
use crate::views::View;

/// Handle one key press. Returns false when the app should exit.
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    let keep_running = match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Insert => handle_insert_mode(app, key),
        Mode::Command => handle_command_mode(app, key),
        Mode::Help => {
            app.mode = Mode::Normal;
            true
        }
        Mode::Confirm => handle_confirm_mode(app, key),
    };
    keep_running && !app.should_quit
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    if let Some(cmd) = match_key_sequence(&app.key_buffer, key) {
        app.key_buffer.clear();
        if cmd == Command::Quit {
            return false;
        }
        execute_command(app, cmd);
        return true;
    }

    // unmatched characters may start a sequence
    match key.code {
        KeyCode::Char(c) if app.key_buffer.is_empty() && c == 'g' => app.key_buffer.push(c),
        _ => app.key_buffer.clear(),
    }
    true
}

/// Keys go to the open form; Enter submits, Esc leaves
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(form) = app.view.active_form_mut() else {
        app.mode = Mode::Normal;
        return true;
    };

    match form.handle_key(key) {
        FormAction::Submit => app.submit_form(),
        FormAction::Cancel => app.cancel_edit(),
        FormAction::Continue => {
            // live search
            if let View::TaskList(view) = &mut app.view {
                view.filters_changed();
            }
        }
    }
    true
}

fn handle_command_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Normal;
            app.command_input.clear();
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.mode = Mode::Normal;
            return execute_text_command(app, &input);
        }
        KeyCode::Tab => {
            let completion = app
                .command_registry
                .find_matches(app.command_input.trim())
                .first()
                .map(|cmd| cmd.name.to_string());
            if let Some(name) = completion {
                app.command_input = name;
            }
        }
        KeyCode::Backspace => {
            if app.command_input.pop().is_none() {
                app.mode = Mode::Normal;
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
    true
}

fn handle_confirm_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_delete(false),
        _ => {}
    }
    true
}

/// Map the pending prefix plus the current key to a command.
/// `buffer` holds the keys pressed before `key`.
pub fn match_key_sequence(buffer: &[char], key: KeyEvent) -> Option<Command> {
    match (buffer, key.code, key.modifiers) {
        ([], KeyCode::Char('j'), KeyModifiers::NONE) => Some(Command::Down),
        ([], KeyCode::Char('k'), KeyModifiers::NONE) => Some(Command::Up),
        ([], KeyCode::Char('h'), KeyModifiers::NONE) => Some(Command::Left),
        ([], KeyCode::Char('l'), KeyModifiers::NONE) => Some(Command::Right),
        ([], KeyCode::Char('H'), _) => Some(Command::MoveLeft),
        ([], KeyCode::Char('L'), _) => Some(Command::MoveRight),
        ([], KeyCode::Char(c @ '1'..='4'), KeyModifiers::NONE) => {
            Some(Command::MoveToColumn(c as usize - '1' as usize))
        }
        ([], KeyCode::Char('q'), KeyModifiers::NONE) => Some(Command::Quit),
        ([], KeyCode::Char('?'), _) => Some(Command::Help),
        ([], KeyCode::Char(':'), _) => Some(Command::EnterCommandMode),
        ([], KeyCode::Char('i'), KeyModifiers::NONE) => Some(Command::Edit),
        ([], KeyCode::Char('e'), KeyModifiers::NONE) => Some(Command::Edit),
        ([], KeyCode::Char('p'), KeyModifiers::NONE) => Some(Command::ChangePassword),
        ([], KeyCode::Char('n'), KeyModifiers::NONE) => Some(Command::NewItem),
        ([], KeyCode::Char('d'), KeyModifiers::NONE) => Some(Command::Delete),
        ([], KeyCode::Char('r'), KeyModifiers::NONE) => Some(Command::Reload),
        ([], KeyCode::Char('/'), _) => Some(Command::Search),
        ([], KeyCode::Char('f'), KeyModifiers::NONE) => Some(Command::CycleStatusFilter),
        ([], KeyCode::Char('F'), _) => Some(Command::CyclePriorityFilter),
        ([], KeyCode::Char('x'), KeyModifiers::NONE) => Some(Command::ResetFilters),
        ([], KeyCode::Char(']'), _) => Some(Command::NextPage),
        ([], KeyCode::Char('['), _) => Some(Command::PrevPage),
        ([], KeyCode::Enter, _) => Some(Command::Open),
        ([], KeyCode::Esc | KeyCode::Backspace, _) => Some(Command::Back),

        ([], KeyCode::Down, _) => Some(Command::Down),
        ([], KeyCode::Up, _) => Some(Command::Up),
        ([], KeyCode::Left, _) => Some(Command::Left),
        ([], KeyCode::Right, _) => Some(Command::Right),

        // goto sequences
        (['g'], KeyCode::Char('h'), _) => Some(Command::Home),
        (['g'], KeyCode::Char('t'), _) => Some(Command::GoTo(Route::Tasks)),
        (['g'], KeyCode::Char('m'), _) => Some(Command::GoTo(Route::MyTasks)),
        (['g'], KeyCode::Char('n'), _) => Some(Command::GoTo(Route::TaskCreate)),
        (['g'], KeyCode::Char('e'), _) => Some(Command::GoTo(Route::Employees)),
        (['g'], KeyCode::Char('a'), _) => Some(Command::GoTo(Route::AddEmployee)),
        (['g'], KeyCode::Char('s'), _) => Some(Command::GoTo(Route::Stats)),
        (['g'], KeyCode::Char('p'), _) => Some(Command::GoTo(Route::Profile)),
        (['g'], KeyCode::Char('l'), _) => Some(Command::GoTo(Route::Login)),
        (['g'], KeyCode::Char('u'), _) => Some(Command::GoTo(Route::Signup)),
        (['g'], KeyCode::Char('f'), _) => Some(Command::GoTo(Route::ForgotPassword)),
        (['g'], KeyCode::Char('q'), _) => Some(Command::Logout),

        _ => None,
    }
}

fn execute_command(app: &mut App, cmd: Command) {
    match cmd {
        Command::Quit => app.should_quit = true,
        Command::Help => app.mode = Mode::Help,
        Command::EnterCommandMode => {
            app.mode = Mode::Command;
            app.command_input.clear();
        }

        Command::Up => select(app, 0, -1),
        Command::Down => select(app, 0, 1),
        Command::Left => select(app, -1, 0),
        Command::Right => select(app, 1, 0),
        Command::Open => {
            if app.view.active_form_mut().is_some() {
                app.begin_edit();
            } else {
                app.open_selected();
            }
        }

        Command::MoveLeft => app.move_card(MoveTarget::Step(-1)),
        Command::MoveRight => app.move_card(MoveTarget::Step(1)),
        Command::MoveToColumn(column) => app.move_card(MoveTarget::Column(column)),

        Command::Edit => app.begin_edit(),
        Command::ChangePassword => app.begin_password_change(),
        Command::NewItem => {
            if matches!(
                app.view,
                View::Board(_) | View::TaskList(_) | View::Employees(_)
            ) {
                app.new_item();
            }
        }
        Command::Delete => app.request_delete(),

        Command::Search => {
            if matches!(app.view, View::TaskList(_)) {
                app.begin_edit();
            }
        }
        Command::CycleStatusFilter
        | Command::CyclePriorityFilter
        | Command::ResetFilters
        | Command::NextPage
        | Command::PrevPage => {
            if let View::TaskList(view) = &mut app.view {
                match cmd {
                    Command::CycleStatusFilter => view.cycle_status_filter(),
                    Command::CyclePriorityFilter => view.cycle_priority_filter(),
                    Command::ResetFilters => view.reset_filters(),
                    Command::NextPage => view.next_page(),
                    _ => view.prev_page(),
                }
            }
        }

        Command::GoTo(route) => app.navigate(route),
        Command::Home => app.home(),
        Command::Back => app.back(),
        Command::Reload => app.load_view(),
        Command::Logout => app.logout(),
        Command::SetLanguage(code) => match code.parse::<Language>() {
            Ok(lang) => {
                app.config.language = lang;
                if let Err(e) = crate::config::set_language(lang) {
                    tracing::warn!(error = %e, "could not save language");
                }
                // rebuild labels
                if let Some(route) = app.route.clone() {
                    app.navigate(route);
                }
            }
            Err(e) => app.show_notification(e, NotificationLevel::Warning),
        },
    }
}

/// Move the highlight in whatever the view lists
fn select(app: &mut App, dx: isize, dy: isize) {
    match &mut app.view {
        View::Board(view) => {
            if dx != 0 {
                view.select_column(dx);
            }
            if dy != 0 {
                view.select_row(dy);
            }
        }
        View::TaskList(view) => {
            if dy != 0 {
                view.select(dy);
            } else if dx > 0 {
                view.next_page();
            } else {
                view.prev_page();
            }
        }
        View::Employees(view) => view.select(dy),
        View::Stats(view) => view.select(dx + dy),
        View::TaskForm(view) => {
            if let Some(form) = view.form.as_mut() {
                if dy > 0 {
                    form.focus_next();
                } else if dy < 0 {
                    form.focus_prev();
                }
            }
        }
        _ => {}
    }
}

/// Run a `:` command. Returns false to quit.
fn execute_text_command(app: &mut App, input: &str) -> bool {
    let mut parts = input.split_whitespace();
    let Some(name) = parts.next() else {
        return true;
    };
    let arg = parts.next().map(str::to_string);

    let Some(def) = app.command_registry.find_exact(name) else {
        app.show_notification(format!("unknown command: {name}"), NotificationLevel::Warning);
        return true;
    };

    let cmd = match def.name {
        "quit" => return false,
        "help" => Command::Help,
        "home" => Command::Home,
        "tasks" => Command::GoTo(Route::Tasks),
        "mine" => Command::GoTo(Route::MyTasks),
        "new" => Command::GoTo(Route::TaskCreate),
        "employees" => Command::GoTo(Route::Employees),
        "add-employee" => Command::GoTo(Route::AddEmployee),
        "stats" => Command::GoTo(Route::Stats),
        "profile" => Command::GoTo(Route::Profile),
        "reload" => Command::Reload,
        "back" => Command::Back,
        "login" => Command::GoTo(Route::Login),
        "signup" => Command::GoTo(Route::Signup),
        "forgot" => Command::GoTo(Route::ForgotPassword),
        "reset" => Command::GoTo(Route::ResetPassword { token: arg }),
        "logout" => Command::Logout,
        "lang" => match arg {
            Some(code) => Command::SetLanguage(code),
            None => {
                app.show_notification("usage: lang en|fr".to_string(), NotificationLevel::Warning);
                return true;
            }
        },
        _ => return true,
    };

    execute_command(app, cmd);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{self, FakeBackend};
    use crate::app::tests::{settle, signed_in};
    use crate::models::{Role, TaskStatus};

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_sequences() {
        assert_eq!(match_key_sequence(&[], press('j')), Some(Command::Down));
        assert_eq!(match_key_sequence(&[], press('3')), Some(Command::MoveToColumn(2)));
        assert_eq!(
            match_key_sequence(&[], KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT)),
            Some(Command::MoveRight)
        );
        assert_eq!(
            match_key_sequence(&['g'], press('s')),
            Some(Command::GoTo(Route::Stats))
        );
        assert_eq!(match_key_sequence(&[], press('g')), None);
        assert_eq!(match_key_sequence(&[], press('5')), None);
    }

    #[tokio::test]
    async fn test_goto_sequence_navigates() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = signed_in(FakeBackend::new(), Role::Admin, &dir).await;

        app.handle_key(press('g'));
        assert_eq!(app.key_buffer, vec!['g']);
        app.handle_key(press('t'));
        assert!(app.key_buffer.is_empty());
        assert_eq!(app.route, Some(Route::Tasks));

        app.handle_key(press('g'));
        app.handle_key(press('z'));
        assert!(app.key_buffer.is_empty());
        assert_eq!(app.route, Some(Route::Tasks));
    }

    #[tokio::test]
    async fn test_text_commands() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = signed_in(FakeBackend::new(), Role::Admin, &dir).await;

        app.handle_key(press(':'));
        assert_eq!(app.mode, Mode::Command);
        for c in "stats".chars() {
            app.handle_key(press(c));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.route, Some(Route::Stats));

        assert!(execute_text_command(&mut app, "bogus"));
        assert!(app.notification.is_some());
        assert!(!execute_text_command(&mut app, "q"));
    }

    #[tokio::test]
    async fn test_number_keys_move_cards_on_the_board() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new().with_tasks(vec![fake::task(1, TaskStatus::Todo, Some(7))]);
        let (mut app, backend) = signed_in(backend, Role::Admin, &dir).await;

        app.handle_key(press('4'));
        settle(&mut app).await;
        assert_eq!(backend.count("update_task"), 1);
        assert_eq!(backend.updates.lock().unwrap()[0].status, TaskStatus::Closed);
    }

    #[tokio::test]
    async fn test_login_form_typing_and_submit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, backend) = crate::app::tests::app_with(FakeBackend::new(), &dir);
        app.start();
        settle(&mut app).await;
        assert_eq!(app.mode, Mode::Insert);

        for c in "who@example.com".chars() {
            app.handle_key(press(c));
        }
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        for c in "wrong".chars() {
            app.handle_key(press(c));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        settle(&mut app).await;

        assert_eq!(backend.count("login"), 1);
        assert_eq!(app.route, Some(Route::Login));
        let notification = app.notification.clone().unwrap();
        assert!(notification.message.starts_with("Login failed"));
    }
}
