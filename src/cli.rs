//! Non-interactive commands. `tdk` with no subcommand starts the TUI.

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::api::{Backend, HttpBackend};
use crate::config::{self, Config};
use crate::i18n::{t, Language};
use crate::models::{username_of, CategoryCounts, Priority, StatsKind, Task, TaskId, TaskStatus};
use crate::session::{self, Session, SessionFile, SessionState, SessionStore};
use crate::views::board::{self, BoardData, BoardView, MovePolicy, PendingMove};
use crate::views::stats::StatPanel;
use crate::views::task_list::TaskListView;
use crate::views::Load;

const BAR_WIDTH: u64 = 30;

#[derive(Parser)]
#[command(
    name = "tdk",
    version,
    about = "Terminal client for the task-management backend",
    after_help = "\
Run without a subcommand to open the interactive board.

ENVIRONMENT:
  TASKDESK_SERVER  backend origin, overrides the config file
  TASKDESK_LOG     log filter (default: info), written to the data directory"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        /// Account email; prompted when omitted
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// List tasks
    Tasks {
        /// Only tasks assigned to me
        #[arg(long)]
        mine: bool,

        /// todo, in-progress, completed or closed
        #[arg(long)]
        status: Option<TaskStatus>,

        /// low, medium or high
        #[arg(long)]
        priority: Option<Priority>,

        /// Match title or assignee username
        #[arg(long)]
        search: Option<String>,
    },

    /// Move a task to another status
    Move {
        id: TaskId,
        status: TaskStatus,
    },

    /// Print task statistics
    Stats {
        /// status, priority, day, week, month or deadline; all when omitted
        kind: Option<String>,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Set the backend origin
    Server { url: String },
    /// Set the interface language (en, fr)
    Language { code: String },
}

/// Handle a subcommand.
/// Returns true when there was none and the TUI should start.
pub async fn handle_cli() -> Result<bool> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        return Ok(true);
    };

    if let Commands::Config { action } = command {
        handle_config(action)?;
        return Ok(false);
    }

    let config = config::load_config()?;
    let (tx, rx) = session::channel();
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config, rx)?);
    let store = SessionStore::new(tx, backend.clone(), SessionFile::default_location()?);
    let lang = config.language;

    match command {
        Commands::Login { email } => {
            let email = match email {
                Some(email) => email,
                None => prompt("Email: ")?,
            };
            let password = read_secret("Password: ")?;
            store.login(&email, &password).await?;
            if let Some(session) = store.current().session() {
                println!("✓ signed in as {} ({})", session.display_name(), session.role);
            }
        }
        Commands::Logout => {
            store.logout();
            println!("✓ {}", t(lang, "logged_out"));
        }
        Commands::Whoami => {
            let session = require_session(&store).await?;
            println!("{}", session.display_name());
            println!("  email:   {}", session.email);
            println!("  role:    {}", session.role);
            if let Some(id) = session.user_id {
                println!("  id:      {}", id);
            }
            println!("  server:  {}", config.server_url);
        }
        Commands::Tasks {
            mine,
            status,
            priority,
            search,
        } => {
            let session = require_session(&store).await?;
            let data = board::fetch_board(backend.as_ref()).await?;
            let filter = TaskFilter {
                mine,
                status,
                priority,
                search,
            };
            let lines = task_lines(data, &filter, &session, &config);
            if lines.is_empty() {
                println!("{}", t(lang, "no_tasks"));
            }
            for line in lines {
                println!("{}", line);
            }
        }
        Commands::Move { id, status } => {
            let session = require_session(&store).await?;
            let pending = move_task(backend.as_ref(), config.move_policy, &session, id, status).await?;
            println!(
                "✓ #{} {} → {}",
                pending.task_id,
                t(lang, pending.from.label_key()),
                t(lang, pending.to.label_key())
            );
        }
        Commands::Stats { kind } => {
            require_session(&store).await?;
            let kinds = match kind {
                Some(name) => vec![StatsKind::parse(&name)
                    .with_context(|| format!("unknown stats kind: {name}"))?],
                None => StatsKind::DASHBOARD
                    .into_iter()
                    .chain(std::iter::once(StatsKind::ByMonth))
                    .collect(),
            };
            for kind in kinds {
                let counts = backend.stats(kind).await?;
                println!("{}", t(lang, kind.title_key()));
                for line in stats_lines(lang, kind, counts) {
                    println!("  {}", line);
                }
                println!();
            }
        }
        Commands::Config { .. } => {}
    }

    Ok(false)
}

/// Same order and labels as the stats view
fn stats_lines(lang: Language, kind: StatsKind, counts: CategoryCounts) -> Vec<String> {
    let panel = StatPanel {
        kind,
        data: Load::Ready(counts),
    };
    match panel.chart(lang) {
        Some(chart) => bar_lines(&chart.points),
        None => vec![t(lang, "no_data").to_string()],
    }
}

fn handle_config(action: Option<ConfigCommands>) -> Result<()> {
    match action {
        None | Some(ConfigCommands::Show) => config::show_config(),
        Some(ConfigCommands::Server { url }) => {
            let url = config::set_server(url)?;
            println!("✓ server set to {}", url);
            Ok(())
        }
        Some(ConfigCommands::Language { code }) => {
            let language: Language = code.parse().map_err(anyhow::Error::msg)?;
            config::set_language(language)?;
            println!("✓ language set to {}", language.code());
            Ok(())
        }
    }
}

/// Revalidate the stored session; commands other than login need one
async fn require_session(store: &SessionStore) -> Result<Session> {
    match store.restore().await {
        SessionState::Authenticated(session) => Ok(session),
        _ => bail!("not signed in, run `tdk login` first"),
    }
}

pub struct TaskFilter {
    pub mine: bool,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

/// One line per task passing the filter, same matching as the task list view
pub fn task_lines(data: BoardData, filter: &TaskFilter, session: &Session, config: &Config) -> Vec<String> {
    let lang = config.language;
    let mut view = TaskListView::new(lang, config.page_size, filter.mine, session.user_id);
    view.status_filter = filter.status;
    view.priority_filter = filter.priority;
    if let Some(query) = &filter.search {
        view.search.set_value("query", query);
    }
    view.loaded(Ok(data));

    let employees = view.data.ready().map(|d| d.employees.clone()).unwrap_or_default();
    view.filtered()
        .into_iter()
        .map(|task| task_line(task, &employees, lang))
        .collect()
}

fn task_line(task: &Task, employees: &[crate::models::User], lang: Language) -> String {
    let deadline = task
        .deadline
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let assignee = username_of(employees, task.assigned_employee_id).unwrap_or(t(lang, "unassigned"));
    format!(
        "#{:<5} {:<12} {:<8} {:<10} {:<14} {}",
        task.id,
        t(lang, task.status.label_key()),
        t(lang, task.priority.label_key()),
        deadline,
        assignee,
        task.title
    )
}

/// Fetch one task, apply the board's move rules, and save the new status
pub async fn move_task(
    backend: &dyn Backend,
    policy: MovePolicy,
    actor: &Session,
    id: TaskId,
    to: TaskStatus,
) -> Result<PendingMove> {
    let task = backend.get_task(id).await?;
    let mut board = BoardView::new(policy);
    board.loaded(Ok(BoardData {
        tasks: vec![task],
        employees: Vec::new(),
    }));
    let pending = board.begin_move(id, to, Some(actor))?;
    board::commit_move(backend, &pending).await?;
    Ok(pending)
}

/// Horizontal text bars scaled to the largest value
pub fn bar_lines(points: &[(String, u64)]) -> Vec<String> {
    let max = points.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);
    let width = points.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    points
        .iter()
        .map(|(label, value)| {
            let len = (value * BAR_WIDTH).div_ceil(max) as usize;
            format!("{:<width$}  {} {}", label, "█".repeat(len), value, width = width)
        })
        .collect()
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Read a line without echo
fn read_secret(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    enable_raw_mode()?;
    let secret = read_hidden();
    disable_raw_mode()?;
    println!();
    secret
}

fn read_hidden() -> Result<String> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Esc => bail!("cancelled"),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => bail!("cancelled"),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{self, FakeBackend};
    use crate::models::Role;
    use clap::CommandFactory;

    fn employee(id: u64) -> Session {
        Session {
            token: "tok".to_string(),
            role: Role::Employee,
            email: "e@example.com".to_string(),
            user_id: Some(id),
            username: Some("alice".to_string()),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_move_and_filters() {
        let cli = Cli::try_parse_from(["tdk", "move", "12", "in-progress"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Move { id: 12, status: TaskStatus::InProgress })
        ));

        let cli = Cli::try_parse_from(["tdk", "tasks", "--mine", "--priority", "high"]).unwrap();
        match cli.command {
            Some(Commands::Tasks { mine, priority, status, .. }) => {
                assert!(mine);
                assert_eq!(priority, Some(Priority::High));
                assert_eq!(status, None);
            }
            _ => panic!("expected tasks"),
        }

        assert!(Cli::try_parse_from(["tdk", "move", "1", "archived"]).is_err());
        assert!(Cli::try_parse_from(["tdk"]).unwrap().command.is_none());
    }

    #[tokio::test]
    async fn test_move_by_assignee_sends_update() {
        let backend = FakeBackend::new().with_tasks(vec![fake::task(3, TaskStatus::Todo, Some(7))]);

        let pending = move_task(&backend, MovePolicy::AssigneeOnly, &employee(7), 3, TaskStatus::Completed)
            .await
            .unwrap();

        assert_eq!(pending.from, TaskStatus::Todo);
        let updates = backend.updates.lock().unwrap().clone();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].status, TaskStatus::Completed);
        assert_eq!(updates[0].title, "Task 3");
    }

    #[tokio::test]
    async fn test_move_by_other_employee_is_refused() {
        let backend = FakeBackend::new().with_tasks(vec![fake::task(3, TaskStatus::Todo, Some(7))]);

        let result = move_task(&backend, MovePolicy::AssigneeOnly, &employee(8), 3, TaskStatus::Completed).await;

        assert!(result.is_err());
        assert_eq!(backend.count("update_task"), 0);
    }

    #[test]
    fn test_task_lines_apply_filters() {
        let data = BoardData {
            tasks: vec![
                fake::task(1, TaskStatus::Todo, Some(7)),
                fake::task(2, TaskStatus::Completed, Some(7)),
                fake::task(3, TaskStatus::Todo, Some(9)),
            ],
            employees: vec![fake::user(7, "alice", Role::Employee), fake::user(9, "bob", Role::Employee)],
        };
        let filter = TaskFilter {
            mine: true,
            status: Some(TaskStatus::Todo),
            priority: None,
            search: None,
        };

        let lines = task_lines(data, &filter, &employee(7), &Config::default());

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("#1"));
        assert!(lines[0].contains("alice"));
    }

    #[test]
    fn test_bar_lines_scale_to_max() {
        let lines = bar_lines(&[("Low".to_string(), 2), ("High".to_string(), 4)]);
        assert_eq!(lines[0], format!("Low   {} 2", "█".repeat(15)));
        assert_eq!(lines[1], format!("High  {} 4", "█".repeat(30)));
        assert!(bar_lines(&[]).is_empty());
    }

    #[test]
    fn test_stats_lines_follow_the_board_order() {
        let counts: CategoryCounts = [("CLOSED", 1), ("COMPLETED", 2), ("IN_PROGRESS", 3), ("TODO", 4)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let lines = stats_lines(Language::En, StatsKind::ByStatus, counts);
        let labels: Vec<&str> = lines.iter().filter_map(|l| l.split("  ").next()).map(str::trim).collect();
        assert_eq!(labels, vec!["To do", "In progress", "Completed", "Closed"]);

        let empty = stats_lines(Language::En, StatsKind::ByWeek, CategoryCounts::new());
        assert_eq!(empty, vec![t(Language::En, "no_data").to_string()]);
    }
}
