//! In-memory backend for tests

use async_trait::async_trait;
use serde_json::Map;
use std::collections::HashMap;
use std::sync::Mutex;

use super::Backend;
use crate::error::ApiError;
use crate::models::{
    CategoryCounts, Credentials, EmployeeSummary, LoginResponse, NewEmployee, PasswordChange,
    Priority, ProfileUpdate, Role, SignupRequest, StatsKind, Task, TaskDraft, TaskId, TaskStatus,
    User, UserId, VerifyRequest,
};

#[derive(Default)]
pub struct FakeBackend {
    pub tasks: Mutex<Vec<Task>>,
    pub employees: Mutex<Vec<User>>,
    pub summaries: Mutex<Vec<EmployeeSummary>>,
    pub me: Mutex<Option<User>>,
    pub login_result: Mutex<Option<Result<LoginResponse, ApiError>>>,
    pub validate_result: Mutex<Option<Result<User, ApiError>>>,
    pub update_error: Mutex<Option<ApiError>>,
    pub stats: Mutex<HashMap<StatsKind, CategoryCounts>>,
    pub calls: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<Task>>,
    pub created: Mutex<Vec<TaskDraft>>,
    pub deleted: Mutex<Vec<TaskId>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.lock().unwrap() = tasks;
        self
    }

    pub fn with_employees(self, employees: Vec<User>) -> Self {
        *self.employees.lock().unwrap() = employees;
        self
    }

    pub fn with_login(self, result: Result<LoginResponse, ApiError>) -> Self {
        *self.login_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_validation(self, result: Result<User, ApiError>) -> Self {
        *self.validate_result.lock().unwrap() = Some(result);
        self
    }

    pub fn failing_updates(self, err: ApiError) -> Self {
        *self.update_error.lock().unwrap() = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

pub fn task(id: TaskId, status: TaskStatus, assignee: Option<UserId>) -> Task {
    Task {
        id,
        title: format!("Task {id}"),
        description: "Prepare the weekly report for the team".to_string(),
        status,
        priority: Priority::Medium,
        deadline: chrono::NaiveDate::from_ymd_opt(2025, 7, 1),
        estimated_duration: Some(3.0),
        actual_duration: None,
        assigned_employee_id: assignee,
        extra: Map::new(),
    }
}

pub fn user(id: UserId, username: &str, role: Role) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role: Some(role),
        first_name: None,
        last_name: None,
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.record("login");
        match self.login_result.lock().unwrap().clone() {
            Some(result) => result,
            None => Err(ApiError::Unauthenticated(format!(
                "bad credentials for {}",
                credentials.email
            ))),
        }
    }

    async fn signup(&self, _request: &SignupRequest) -> Result<(), ApiError> {
        self.record("signup");
        Ok(())
    }

    async fn verify(&self, request: &VerifyRequest) -> Result<(), ApiError> {
        self.record("verify");
        if request.verification_code == "000000" {
            return Err(ApiError::from_status(400, "Invalid verification code"));
        }
        Ok(())
    }

    async fn forgot_password(&self, _email: &str) -> Result<String, ApiError> {
        self.record("forgot_password");
        Ok("Reset link sent".to_string())
    }

    async fn reset_password(&self, _token: &str, _password: &str) -> Result<String, ApiError> {
        self.record("reset_password");
        Ok("Password reset".to_string())
    }

    async fn validate_token(&self) -> Result<User, ApiError> {
        self.record("validate_token");
        self.validate_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(ApiError::NoSession))
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.record("list_tasks");
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        self.record("get_task");
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("task {id}")))
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        self.record("create_task");
        self.created.lock().unwrap().push(draft.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<(), ApiError> {
        self.record("update_task");
        self.updates.lock().unwrap().push(task.clone());
        if let Some(err) = self.update_error.lock().unwrap().clone() {
            return Err(err);
        }
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(stored) = tasks.iter_mut().find(|t| t.id == task.id) {
            *stored = task.clone();
        }
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.record("delete_task");
        self.deleted.lock().unwrap().push(id);
        self.tasks.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<User>, ApiError> {
        self.record("list_employees");
        Ok(self.employees.lock().unwrap().clone())
    }

    async fn employee_summaries(&self) -> Result<Vec<EmployeeSummary>, ApiError> {
        self.record("employee_summaries");
        Ok(self.summaries.lock().unwrap().clone())
    }

    async fn add_employee(&self, _employee: &NewEmployee) -> Result<(), ApiError> {
        self.record("add_employee");
        Ok(())
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.record("current_user");
        self.me
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::NotFound("me".to_string()))
    }

    async fn update_current_user(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.record("update_current_user");
        let mut me = self.me.lock().unwrap();
        let user = me.as_mut().ok_or(ApiError::NoSession)?;
        user.username = update.username.clone();
        user.email = update.email.clone();
        Ok(user.clone())
    }

    async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.record("get_user");
        self.employees
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("user {id}")))
    }

    async fn update_user(&self, id: UserId, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.record("update_user");
        let mut employees = self.employees.lock().unwrap();
        let user = employees
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("user {id}")))?;
        user.username = update.username.clone();
        user.email = update.email.clone();
        Ok(user.clone())
    }

    async fn change_password(&self, _change: &PasswordChange) -> Result<(), ApiError> {
        self.record("change_password");
        Ok(())
    }

    async fn stats(&self, kind: StatsKind) -> Result<CategoryCounts, ApiError> {
        self.record("stats");
        Ok(self.stats.lock().unwrap().get(&kind).cloned().unwrap_or_default())
    }
}
