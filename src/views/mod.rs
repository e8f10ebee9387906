//! View state, one module per screen.
//!
//! Views hold data and selection only; rendering lives in `ui` and request
//! dispatch in `app`.

pub mod auth;
pub mod board;
pub mod form;
pub mod people;
pub mod stats;
pub mod task_form;
pub mod task_list;

use crate::error::ApiError;

/// Data fetched for a view
#[derive(Debug, Clone, PartialEq)]
pub enum Load<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Load<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// State of the open screen
pub enum View {
    /// Session still being revalidated
    Splash,
    Auth(auth::AuthView),
    Unauthorized,
    Board(board::BoardView),
    TaskList(task_list::TaskListView),
    TaskForm(task_form::TaskFormView),
    Employees(people::EmployeesView),
    AddEmployee(people::AddEmployeeView),
    EmployeeProfile(people::EmployeeProfileView),
    Profile(people::ProfileView),
    Stats(stats::StatsView),
}

impl View {
    /// Form receiving keystrokes, if the view is editing one
    pub fn active_form_mut(&mut self) -> Option<&mut form::Form> {
        match self {
            Self::Auth(view) => Some(&mut view.form),
            Self::TaskForm(view) => view.form.as_mut(),
            Self::AddEmployee(view) => Some(&mut view.form),
            Self::Profile(view) => view.active_form_mut(),
            Self::TaskList(view) if view.searching => Some(&mut view.search),
            _ => None,
        }
    }
}
