use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};

use crate::api::Backend;
use crate::config::Config;
use crate::error::{ApiError, ErrorCategory};
use crate::guard::{self, Route};
use crate::i18n::t;
use crate::input::CommandRegistry;
use crate::models::{CategoryCounts, EmployeeSummary, Role, StatsKind, Task, TaskStatus, User};
use crate::scope::{Envelope, ScopeId, ViewScope};
use crate::session::{Session, SessionState, SessionStore};
use crate::views::auth::{self, AuthKind, AuthOutcome, AuthView};
use crate::views::board::{self, BoardData, BoardView, PendingMove};
use crate::views::people::{
    AddEmployeeView, EmployeeProfileView, EmployeesView, ProfileMode, ProfileView,
};
use crate::views::stats::StatsView;
use crate::views::task_form::{self, TaskFormMode, TaskFormView};
use crate::views::task_list::TaskListView;
use crate::views::View;

/// Scope of app-level work (session restore and writes); never discarded
pub const APP_SCOPE: ScopeId = 0;

const HISTORY_LIMIT: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// Gone after 3 seconds
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigation and view keys
    Normal,
    /// Keystrokes go to the open form
    Insert,
    /// Typing a `:` command
    Command,
    Help,
    /// Waiting for y/n on a delete
    Confirm,
}

/// Target of a card move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    Step(isize),
    Column(usize),
}

/// Result of work spawned by a view
#[derive(Debug)]
pub enum AppEvent {
    SessionRestored(SessionState),
    Auth(Result<AuthOutcome, ApiError>),
    BoardLoaded(Result<BoardData, ApiError>),
    /// `origin` is the scope of the board that started the move
    MoveSettled {
        origin: ScopeId,
        pending: PendingMove,
        result: Result<(), ApiError>,
    },
    TasksLoaded(Result<BoardData, ApiError>),
    FormEmployeesLoaded(Result<Vec<User>, ApiError>),
    TaskLoaded(Result<(Task, Vec<User>), ApiError>),
    /// Create, update or delete finished; `key` names the success message
    TaskSaved {
        origin: ScopeId,
        key: &'static str,
        result: Result<(), ApiError>,
    },
    SummariesLoaded(Result<Vec<EmployeeSummary>, ApiError>),
    EmployeeAdded(Result<(), ApiError>),
    UserLoaded(Result<User, ApiError>),
    ProfileSaved(Result<User, ApiError>),
    PasswordChanged(Result<(), ApiError>),
    StatsLoaded(StatsKind, Result<CategoryCounts, ApiError>),
}

pub struct App {
    pub config: Config,
    backend: Arc<dyn Backend>,
    pub session: SessionStore,
    session_rx: watch::Receiver<SessionState>,
    /// Set once the stored session has been checked
    restored: bool,
    /// Route the user asked for
    pub requested: Route,
    /// Route on screen after the guard; `None` while the session loads
    pub route: Option<Route>,
    pub history: Vec<Route>,
    pub view: View,
    scope: ViewScope<AppEvent>,
    /// Restore and every write; outlives views
    app_scope: ViewScope<AppEvent>,
    next_scope: ScopeId,
    pub(crate) tx: mpsc::UnboundedSender<Envelope<AppEvent>>,
    pub(crate) rx: mpsc::UnboundedReceiver<Envelope<AppEvent>>,
    pub mode: Mode,
    /// Pending prefix keys (`g` sequences)
    pub key_buffer: Vec<char>,
    pub command_input: String,
    pub command_registry: CommandRegistry,
    pub notification: Option<Notification>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, backend: Arc<dyn Backend>, session: SessionStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let session_rx = session.subscribe();

        Self {
            config,
            backend,
            session,
            session_rx,
            restored: false,
            requested: Route::Login,
            route: None,
            history: Vec::new(),
            view: View::Splash,
            scope: ViewScope::new(1, tx.clone()),
            app_scope: ViewScope::new(APP_SCOPE, tx.clone()),
            next_scope: 1,
            tx,
            rx,
            mode: Mode::Normal,
            key_buffer: Vec::new(),
            command_input: String::new(),
            command_registry: CommandRegistry::new(),
            notification: None,
            should_quit: false,
        }
    }

    /// Kick off the session check; the splash view shows until it settles
    pub fn start(&mut self) {
        let store = self.session.clone();
        self.app_scope
            .spawn(async move { AppEvent::SessionRestored(store.restore().await) });
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        crate::input::handle_key_input(self, key)
    }

    pub fn actor(&self) -> Option<Session> {
        self.session.current().session().cloned()
    }

    pub fn is_admin(&self) -> bool {
        self.session.current().role() == Some(Role::Admin)
    }

    pub fn scope_id(&self) -> ScopeId {
        self.scope.id()
    }

    pub fn in_flight(&self) -> usize {
        self.scope.in_flight() + self.app_scope.in_flight()
    }

    // ----- navigation -----

    pub fn navigate(&mut self, route: Route) {
        if let Some(current) = self.route.clone() {
            if current != route {
                self.history.push(current);
                if self.history.len() > HISTORY_LIMIT {
                    self.history.remove(0);
                }
            }
        }
        self.requested = route;
        let resolved = guard::resolve(&self.requested, &self.session.current());
        self.open_view(resolved);
    }

    pub fn back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.requested = previous;
            let resolved = guard::resolve(&self.requested, &self.session.current());
            self.open_view(resolved);
        }
    }

    pub fn home(&mut self) {
        match self.session.current().role() {
            Some(role) => self.navigate(Route::home_for(role)),
            None => self.navigate(Route::Login),
        }
    }

    /// Re-run the guard when the session changed under the open view
    pub fn sync_session(&mut self) {
        if !self.session_rx.has_changed().unwrap_or(false) {
            return;
        }
        drop(self.session_rx.borrow_and_update());
        if !self.restored {
            return;
        }

        let resolved = guard::resolve(&self.requested, &self.session.current());
        if resolved != self.route {
            tracing::info!(requested = ?self.requested, shown = ?resolved, "session changed, re-routing");
            self.open_view(resolved);
        }
    }

    /// Replace the open view. The old scope is dropped, aborting its requests.
    fn open_view(&mut self, route: Option<Route>) {
        self.next_scope += 1;
        self.scope = ViewScope::new(self.next_scope, self.tx.clone());
        self.key_buffer.clear();
        self.mode = Mode::Normal;

        let Some(route) = route else {
            self.view = View::Splash;
            self.route = None;
            return;
        };
        tracing::debug!(route = ?route, scope = self.next_scope, "open view");

        let lang = self.config.language;
        let is_admin = self.is_admin();
        let user_id = self.actor().and_then(|s| s.user_id);

        self.view = match &route {
            Route::Login
            | Route::Signup
            | Route::Verify { .. }
            | Route::ForgotPassword
            | Route::ResetPassword { .. } => match AuthView::for_route(&route, lang) {
                Some(view) => View::Auth(view),
                None => View::Unauthorized,
            },
            Route::Unauthorized => View::Unauthorized,
            Route::AdminDashboard | Route::EmployeeDashboard => {
                View::Board(BoardView::new(self.config.move_policy))
            }
            Route::Tasks => View::TaskList(TaskListView::new(lang, self.config.page_size, false, user_id)),
            Route::MyTasks => View::TaskList(TaskListView::new(lang, self.config.page_size, true, user_id)),
            Route::TaskDetail(id) => View::TaskForm(TaskFormView::new(TaskFormMode::Edit(*id), is_admin, lang)),
            Route::TaskCreate => View::TaskForm(TaskFormView::new(TaskFormMode::Create, is_admin, lang)),
            Route::Employees => View::Employees(EmployeesView::new()),
            Route::AddEmployee => View::AddEmployee(AddEmployeeView::new(lang)),
            Route::EmployeeProfile(id) => View::EmployeeProfile(EmployeeProfileView::new(*id)),
            Route::Profile => View::Profile(ProfileView::new(lang)),
            Route::Stats => View::Stats(StatsView::new()),
        };
        self.route = Some(route);

        if matches!(self.view, View::Auth(_) | View::AddEmployee(_)) {
            self.mode = Mode::Insert;
        }
        self.load_view();
    }

    /// Fetch whatever the open view shows
    pub fn load_view(&mut self) {
        let backend = self.backend.clone();
        match &mut self.view {
            View::Board(view) => {
                view.data = crate::views::Load::Loading;
                self.scope.spawn(async move {
                    AppEvent::BoardLoaded(board::fetch_board(backend.as_ref()).await)
                });
            }
            View::TaskList(view) => {
                view.data = crate::views::Load::Loading;
                self.scope.spawn(async move {
                    AppEvent::TasksLoaded(board::fetch_board(backend.as_ref()).await)
                });
            }
            View::TaskForm(view) => match view.mode {
                TaskFormMode::Create => self.scope.spawn(async move {
                    AppEvent::FormEmployeesLoaded(backend.list_employees().await)
                }),
                TaskFormMode::Edit(id) => self.scope.spawn(async move {
                    AppEvent::TaskLoaded(task_form::fetch_for_edit(backend.as_ref(), id).await)
                }),
            },
            View::Employees(_) => self.scope.spawn(async move {
                AppEvent::SummariesLoaded(backend.employee_summaries().await)
            }),
            View::EmployeeProfile(view) => {
                let id = view.id;
                self.scope
                    .spawn(async move { AppEvent::UserLoaded(backend.get_user(id).await) });
            }
            View::Profile(_) => self
                .scope
                .spawn(async move { AppEvent::UserLoaded(backend.current_user().await) }),
            View::Stats(_) => {
                for kind in StatsKind::DASHBOARD {
                    let backend = backend.clone();
                    self.scope.spawn(async move {
                        AppEvent::StatsLoaded(kind, backend.stats(kind).await)
                    });
                }
            }
            View::Splash | View::Auth(_) | View::Unauthorized | View::AddEmployee(_) => {}
        }
    }

    // ----- events -----

    /// Apply every finished request; results of closed views are dropped
    pub fn pump(&mut self) {
        self.sync_session();
        while let Ok(envelope) = self.rx.try_recv() {
            self.dispatch(envelope);
        }
        self.sync_session();
    }

    pub(crate) fn dispatch(&mut self, envelope: Envelope<AppEvent>) {
        if envelope.scope != APP_SCOPE && envelope.scope != self.scope.id() {
            tracing::debug!(scope = envelope.scope, "dropping result of a closed view");
            return;
        }
        self.handle_event(envelope.event);
    }

    fn handle_event(&mut self, event: AppEvent) {
        let lang = self.config.language;

        match event {
            AppEvent::SessionRestored(state) => {
                self.restored = true;
                drop(self.session_rx.borrow_and_update());
                match state.role() {
                    Some(role) => self.navigate(Route::home_for(role)),
                    None => self.navigate(Route::Login),
                }
            }
            AppEvent::Auth(result) => {
                let login = if let View::Auth(view) = &mut self.view {
                    view.submitting = false;
                    view.error = result.as_ref().err().map(|e| e.to_string());
                    view.kind == AuthKind::Login
                } else {
                    false
                };
                match result {
                    Ok(outcome) => {
                        if let Some(message) = outcome.message {
                            self.notify(message, NotificationLevel::Success);
                        }
                        self.navigate(outcome.route);
                    }
                    Err(e) if login => {
                        self.notify(format!("{}: {e}", t(lang, "login_failed")), NotificationLevel::Error);
                    }
                    Err(e) => self.notify(e.to_string(), NotificationLevel::Error),
                }
            }
            AppEvent::BoardLoaded(result) => {
                if let Err(e) = &result {
                    self.report(e);
                }
                if let View::Board(view) = &mut self.view {
                    view.loaded(result);
                }
            }
            AppEvent::MoveSettled {
                origin,
                pending,
                result,
            } => {
                let reverted = match &mut self.view {
                    View::Board(view) if origin == self.scope.id() => view.settle_move(&pending, &result),
                    _ => false,
                };
                if let Err(e) = result {
                    if reverted {
                        self.notify(format!("{}: {e}", t(lang, "move_reverted")), NotificationLevel::Error);
                    } else {
                        tracing::warn!(task = pending.task_id, error = %e, "move failed after leaving the board");
                        self.notify(format!("{}: {e}", t(lang, "move_failed")), NotificationLevel::Error);
                    }
                    if e.category() == ErrorCategory::Authorization {
                        self.navigate(Route::Unauthorized);
                    }
                }
            }
            AppEvent::TasksLoaded(result) => {
                if let Err(e) = &result {
                    self.report(e);
                }
                if let View::TaskList(view) = &mut self.view {
                    view.loaded(result);
                }
            }
            AppEvent::FormEmployeesLoaded(result) => {
                if let View::TaskForm(view) = &mut self.view {
                    view.employees_loaded(result);
                    if view.is_admin {
                        self.mode = Mode::Insert;
                    }
                }
            }
            AppEvent::TaskLoaded(result) => {
                if let Err(e) = &result {
                    self.report(e);
                }
                if let View::TaskForm(view) = &mut self.view {
                    view.task_loaded(result);
                }
            }
            AppEvent::TaskSaved { origin, key, result } => {
                let still_open = origin == self.scope.id() && matches!(self.view, View::TaskForm(_));
                match result {
                    Ok(()) => {
                        self.notify(t(lang, key).to_string(), NotificationLevel::Success);
                        if still_open {
                            self.navigate(Route::Tasks);
                        }
                    }
                    Err(e) => {
                        if still_open {
                            if let View::TaskForm(view) = &mut self.view {
                                view.submitting = false;
                            }
                        }
                        self.report(&e);
                    }
                }
            }
            AppEvent::SummariesLoaded(result) => {
                if let Err(e) = &result {
                    self.report(e);
                }
                if let View::Employees(view) = &mut self.view {
                    view.loaded(result);
                }
            }
            AppEvent::EmployeeAdded(result) => {
                if let View::AddEmployee(view) = &mut self.view {
                    view.submitting = false;
                    if result.is_ok() {
                        view.added();
                    }
                }
                match result {
                    Ok(()) => self.notify(t(lang, "employee_added").to_string(), NotificationLevel::Success),
                    Err(e) => self.report(&e),
                }
            }
            AppEvent::UserLoaded(result) => {
                if let Err(e) = &result {
                    self.report(e);
                }
                match &mut self.view {
                    View::EmployeeProfile(view) => view.user = crate::views::Load::from_result(result),
                    View::Profile(view) => view.user = crate::views::Load::from_result(result),
                    _ => {}
                }
            }
            AppEvent::ProfileSaved(result) => match result {
                Ok(user) => {
                    if let View::Profile(view) = &mut self.view {
                        view.saved(user);
                        self.mode = Mode::Normal;
                    }
                    self.notify(t(lang, "profile_saved").to_string(), NotificationLevel::Success);
                }
                Err(e) => {
                    if let View::Profile(view) = &mut self.view {
                        view.submitting = false;
                    }
                    self.report(&e);
                }
            },
            AppEvent::PasswordChanged(result) => {
                if let View::Profile(view) = &mut self.view {
                    view.submitting = false;
                    if result.is_ok() {
                        view.cancel();
                        self.mode = Mode::Normal;
                    }
                }
                match result {
                    Ok(()) => self.notify(t(lang, "password_changed").to_string(), NotificationLevel::Success),
                    Err(e) => self.report(&e),
                }
            }
            AppEvent::StatsLoaded(kind, result) => {
                if let Err(e) = &result {
                    tracing::warn!(?kind, error = %e, "stats panel failed");
                }
                if let View::Stats(view) = &mut self.view {
                    view.loaded(kind, result);
                }
            }
        }
    }

    /// Surface a failed request according to its category
    pub fn report(&mut self, err: &ApiError) {
        tracing::warn!(error = %err, "request failed");
        match err.category() {
            ErrorCategory::Authorization => {
                self.notify(err.to_string(), NotificationLevel::Error);
                self.navigate(Route::Unauthorized);
            }
            ErrorCategory::Authentication | ErrorCategory::Notice => {
                self.notify(err.to_string(), NotificationLevel::Error);
            }
        }
    }

    // ----- actions -----

    pub fn move_card(&mut self, target: MoveTarget) {
        let actor = self.actor();
        let View::Board(view) = &mut self.view else {
            return;
        };

        let attempt = match target {
            MoveTarget::Step(step) => view.shift_selected(step, actor.as_ref()),
            MoveTarget::Column(column) => match TaskStatus::from_column(column) {
                Some(to) => view.move_selected(to, actor.as_ref()),
                None => return,
            },
        };

        match attempt {
            Ok(pending) => {
                let backend = self.backend.clone();
                let origin = self.scope.id();
                self.app_scope.spawn(async move {
                    let result = board::commit_move(backend.as_ref(), &pending).await;
                    AppEvent::MoveSettled {
                        origin,
                        pending,
                        result,
                    }
                });
            }
            Err(rejected) => {
                tracing::debug!(%rejected, "move rejected");
                if let Some(key) = rejected.notice_key() {
                    let message = t(self.config.language, key).to_string();
                    self.notify(message, NotificationLevel::Warning);
                }
            }
        }
    }

    /// Open the highlighted row or card
    pub fn open_selected(&mut self) {
        let target = match &self.view {
            View::Board(view) => view.selected_task().map(|t| Route::TaskDetail(t.id)),
            View::TaskList(view) => view.selected_task().map(|t| Route::TaskDetail(t.id)),
            View::Employees(view) => view.selected_id().map(Route::EmployeeProfile),
            _ => None,
        };
        if let Some(route) = target {
            self.navigate(route);
        }
    }

    pub fn new_item(&mut self) {
        if matches!(self.view, View::Employees(_)) {
            self.navigate(Route::AddEmployee);
        } else {
            self.navigate(Route::TaskCreate);
        }
    }

    /// Start editing the open view's form
    pub fn begin_edit(&mut self) {
        let has_form = self.view.active_form_mut().is_some();
        match &mut self.view {
            View::Profile(view) => {
                view.start_edit();
                if view.mode == ProfileMode::Editing {
                    self.mode = Mode::Insert;
                }
            }
            View::TaskList(view) => {
                view.searching = true;
                self.mode = Mode::Insert;
            }
            _ if has_form => self.mode = Mode::Insert,
            _ => {}
        }
    }

    pub fn begin_password_change(&mut self) {
        if let View::Profile(view) = &mut self.view {
            view.start_password_change();
            if view.mode == ProfileMode::ChangingPassword {
                self.mode = Mode::Insert;
            }
        }
    }

    /// Leave the form without submitting
    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Normal;
        match &mut self.view {
            View::Profile(view) => view.cancel(),
            View::TaskList(view) => view.searching = false,
            _ => {}
        }
    }

    /// Validate the open form and send it
    pub fn submit_form(&mut self) {
        let lang = self.config.language;
        let backend = self.backend.clone();
        let origin = self.scope.id();

        let outcome = match &mut self.view {
            View::Auth(view) if !view.submitting => view.request().map(|request| {
                view.submitting = true;
                view.error = None;
                let store = self.session.clone();
                self.scope.spawn(async move {
                    AppEvent::Auth(auth::perform(&store, request, lang).await)
                });
            }),
            View::TaskForm(view) if !view.submitting => match view.mode {
                TaskFormMode::Create => view.draft().map(|draft| {
                    view.submitting = true;
                    self.app_scope.spawn(async move {
                        AppEvent::TaskSaved {
                            origin,
                            key: "task_created",
                            result: backend.create_task(&draft).await,
                        }
                    });
                }),
                TaskFormMode::Edit(_) => view.updated_task().map(|task| {
                    view.submitting = true;
                    self.app_scope.spawn(async move {
                        AppEvent::TaskSaved {
                            origin,
                            key: "task_updated",
                            result: backend.update_task(&task).await,
                        }
                    });
                }),
            },
            View::AddEmployee(view) if !view.submitting => view.employee().map(|employee| {
                view.submitting = true;
                self.app_scope.spawn(async move {
                    AppEvent::EmployeeAdded(backend.add_employee(&employee).await)
                });
            }),
            View::Profile(view) if !view.submitting => match view.mode {
                ProfileMode::Editing => view.profile_update().map(|update| {
                    view.submitting = true;
                    self.app_scope.spawn(async move {
                        AppEvent::ProfileSaved(backend.update_current_user(&update).await)
                    });
                }),
                ProfileMode::ChangingPassword => view.password_change().map(|change| {
                    view.submitting = true;
                    self.app_scope.spawn(async move {
                        AppEvent::PasswordChanged(backend.change_password(&change).await)
                    });
                }),
                ProfileMode::Viewing => Ok(()),
            },
            View::TaskList(view) => {
                view.searching = false;
                self.mode = Mode::Normal;
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(e) = outcome {
            self.notify(e.to_string(), NotificationLevel::Warning);
        }
    }

    pub fn request_delete(&mut self) {
        if let View::TaskForm(view) = &mut self.view {
            if view.request_delete() {
                self.mode = Mode::Confirm;
            }
        }
    }

    pub fn confirm_delete(&mut self, confirmed: bool) {
        self.mode = Mode::Normal;
        let backend = self.backend.clone();
        let View::TaskForm(view) = &mut self.view else {
            return;
        };
        view.confirm_delete = false;
        let Some(id) = view.task_id() else {
            return;
        };
        if confirmed {
            view.submitting = true;
            let origin = self.scope.id();
            self.app_scope.spawn(async move {
                AppEvent::TaskSaved {
                    origin,
                    key: "task_deleted",
                    result: backend.delete_task(id).await,
                }
            });
        }
    }

    pub fn logout(&mut self) {
        let route = self.session.logout();
        self.history.clear();
        self.navigate(route);
        self.notify(t(self.config.language, "logged_out").to_string(), NotificationLevel::Info);
    }

    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notify(message, level);
    }

    fn notify(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    pub fn clear_expired_notification(&mut self) {
        if self.notification.as_ref().is_some_and(Notification::is_expired) {
            self.notification = None;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::fake::{self, FakeBackend};
    use crate::models::LoginResponse;
    use crate::session::{channel, SessionFile};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Duration;

    pub(crate) fn app_with(backend: FakeBackend, dir: &tempfile::TempDir) -> (App, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let (tx, _rx) = channel();
        let file = SessionFile::new(dir.path().join("session.json"));
        let store = SessionStore::new(tx, backend.clone(), file);
        (App::new(Config::default(), backend.clone(), store), backend)
    }

    /// Deliver events until nothing arrives for a little while
    pub(crate) async fn settle(app: &mut App) {
        while let Ok(Some(envelope)) =
            tokio::time::timeout(Duration::from_millis(50), app.rx.recv()).await
        {
            app.dispatch(envelope);
        }
        app.sync_session();
    }

    fn login_as(id: u64, role: Role) -> LoginResponse {
        LoginResponse {
            token: format!("tok-{id}"),
            role,
            user_id: Some(id),
            username: Some(format!("user{id}")),
        }
    }

    pub(crate) async fn signed_in(backend: FakeBackend, role: Role, dir: &tempfile::TempDir) -> (App, Arc<FakeBackend>) {
        signed_in_as(backend, 7, role, dir).await
    }

    async fn signed_in_as(
        backend: FakeBackend,
        id: u64,
        role: Role,
        dir: &tempfile::TempDir,
    ) -> (App, Arc<FakeBackend>) {
        let (mut app, backend) = app_with(backend.with_login(Ok(login_as(id, role))), dir);
        app.start();
        settle(&mut app).await;
        app.session.login("u@example.com", "pw").await.unwrap();
        app.home();
        settle(&mut app).await;
        (app, backend)
    }

    fn key(c: char) -> KeyEvent {
        let modifiers = if c.is_ascii_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        KeyEvent::new(KeyCode::Char(c), modifiers)
    }

    #[tokio::test]
    async fn test_start_without_session_shows_login() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with(FakeBackend::new(), &dir);
        assert!(matches!(app.view, View::Splash));

        app.start();
        settle(&mut app).await;
        assert_eq!(app.route, Some(Route::Login));
        assert_eq!(app.mode, Mode::Insert);
    }

    #[tokio::test]
    async fn test_employee_is_sent_to_unauthorized_for_stats() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, backend) = signed_in(FakeBackend::new(), Role::Employee, &dir).await;
        assert_eq!(app.route, Some(Route::EmployeeDashboard));

        app.navigate(Route::Stats);
        settle(&mut app).await;
        assert_eq!(app.route, Some(Route::Unauthorized));
        assert!(matches!(app.view, View::Unauthorized));
        assert_eq!(backend.count("stats"), 0);
    }

    #[tokio::test]
    async fn test_stale_results_are_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = signed_in(FakeBackend::new(), Role::Admin, &dir).await;
        let board_scope = app.scope_id();

        app.navigate(Route::Stats);
        assert_ne!(app.scope_id(), board_scope);
        app.tx
            .send(Envelope {
                scope: board_scope,
                event: AppEvent::TasksLoaded(Err(ApiError::Forbidden("late".into()))),
            })
            .unwrap();
        settle(&mut app).await;

        // a late 403 from the closed board would have routed to unauthorized
        assert_eq!(app.route, Some(Route::Stats));
        let View::Stats(view) = &app.view else {
            panic!("stats view expected");
        };
        assert!(view.panels.iter().all(|p| !p.data.is_loading()));
    }

    #[tokio::test]
    async fn test_move_on_board_sends_update() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new().with_tasks(vec![fake::task(1, TaskStatus::Todo, Some(7))]);
        let (mut app, backend) = signed_in(backend, Role::Employee, &dir).await;

        app.handle_key(key('L'));
        let View::Board(view) = &app.view else {
            panic!("board expected");
        };
        assert_eq!(view.column_tasks(TaskStatus::InProgress).len(), 1);
        settle(&mut app).await;
        assert_eq!(backend.count("update_task"), 1);
        assert_eq!(backend.tasks.lock().unwrap()[0].status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_move_survives_leaving_the_board() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new().with_tasks(vec![fake::task(1, TaskStatus::Todo, Some(7))]);
        let (mut app, backend) = signed_in(backend, Role::Employee, &dir).await;

        app.move_card(MoveTarget::Step(1));
        app.open_selected();
        settle(&mut app).await;

        assert_eq!(app.route, Some(Route::TaskDetail(1)));
        assert_eq!(backend.count("update_task"), 1);
        assert_eq!(backend.tasks.lock().unwrap()[0].status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_failed_move_after_leaving_still_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new()
            .with_tasks(vec![fake::task(1, TaskStatus::Todo, Some(7))])
            .failing_updates(ApiError::from_status(500, "boom"));
        let (mut app, _) = signed_in(backend, Role::Employee, &dir).await;

        app.move_card(MoveTarget::Step(1));
        app.navigate(Route::MyTasks);
        settle(&mut app).await;

        assert_eq!(app.route, Some(Route::MyTasks));
        let notification = app.notification.clone().unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(notification.message.contains("boom"));
    }

    #[tokio::test]
    async fn test_other_employee_cannot_move_card() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new()
            .with_tasks(vec![fake::task(1, TaskStatus::Todo, Some(7))])
            .with_employees(vec![fake::user(7, "alice", Role::Employee)]);
        let (mut app, backend) = signed_in_as(backend, 8, Role::Employee, &dir).await;

        app.handle_key(key('L'));
        settle(&mut app).await;

        assert_eq!(backend.count("update_task"), 0);
        assert_eq!(backend.tasks.lock().unwrap()[0].status, TaskStatus::Todo);
        let View::Board(view) = &app.view else {
            panic!("board expected");
        };
        assert_eq!(view.column_tasks(TaskStatus::Todo).len(), 1);
        assert_eq!(app.notification.clone().unwrap().level, NotificationLevel::Warning);
    }

    #[tokio::test]
    async fn test_delete_survives_going_back() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new().with_tasks(vec![fake::task(1, TaskStatus::Todo, Some(7))]);
        let (mut app, backend) = signed_in(backend, Role::Admin, &dir).await;
        app.navigate(Route::TaskDetail(1));
        settle(&mut app).await;

        app.request_delete();
        assert_eq!(app.mode, Mode::Confirm);
        app.confirm_delete(true);
        app.back();
        settle(&mut app).await;

        assert_eq!(backend.count("delete_task"), 1);
        assert_eq!(app.route, Some(Route::AdminDashboard));
        assert_eq!(app.notification.clone().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_failed_move_reverts_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new()
            .with_tasks(vec![fake::task(1, TaskStatus::Todo, Some(7))])
            .failing_updates(ApiError::from_status(500, "boom"));
        let (mut app, _) = signed_in(backend, Role::Employee, &dir).await;

        app.move_card(MoveTarget::Column(2));
        settle(&mut app).await;
        let View::Board(view) = &app.view else {
            panic!("board expected");
        };
        assert_eq!(view.column_tasks(TaskStatus::Todo).len(), 1);
        let notification = app.notification.clone().unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(notification.message.contains("boom"));
    }

    #[tokio::test]
    async fn test_logout_redirects_protected_routes_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = signed_in(FakeBackend::new(), Role::Admin, &dir).await;
        app.logout();
        settle(&mut app).await;
        assert_eq!(app.route, Some(Route::Login));
        assert!(!dir.path().join("session.json").exists());

        app.navigate(Route::Employees);
        assert_eq!(app.route, Some(Route::Login));
    }

    #[tokio::test]
    async fn test_create_task_navigates_to_list() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, backend) = signed_in(FakeBackend::new(), Role::Admin, &dir).await;
        app.navigate(Route::TaskCreate);
        settle(&mut app).await;
        assert_eq!(app.mode, Mode::Insert);

        if let View::TaskForm(view) = &mut app.view {
            let form = view.form.as_mut().unwrap();
            form.set_value("title", "Plan sprint");
            form.set_value("deadline", "2025-09-01");
            form.set_value("estimated_duration", "2");
        }
        app.submit_form();
        settle(&mut app).await;

        assert_eq!(backend.created.lock().unwrap().len(), 1);
        assert_eq!(app.route, Some(Route::Tasks));
    }
}
