//! Backend access.
//!
//! Views and the session store talk to the REST backend only through the
//! [`Backend`] trait so they can run against an in-memory double in tests.

mod http;

#[cfg(test)]
pub mod fake;

pub use http::HttpBackend;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    CategoryCounts, Credentials, EmployeeSummary, LoginResponse, NewEmployee, PasswordChange,
    ProfileUpdate, SignupRequest, StatsKind, Task, TaskDraft, TaskId, User, UserId,
    VerifyRequest,
};

#[async_trait]
pub trait Backend: Send + Sync {
    // auth, sent without a bearer token
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
    async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError>;
    async fn verify(&self, request: &VerifyRequest) -> Result<(), ApiError>;
    async fn forgot_password(&self, email: &str) -> Result<String, ApiError>;
    async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError>;

    /// Check the current token and return its user
    async fn validate_token(&self) -> Result<User, ApiError>;

    // tasks
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;
    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError>;
    async fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError>;
    async fn update_task(&self, task: &Task) -> Result<(), ApiError>;
    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError>;

    // users
    async fn list_employees(&self) -> Result<Vec<User>, ApiError>;
    async fn employee_summaries(&self) -> Result<Vec<EmployeeSummary>, ApiError>;
    async fn add_employee(&self, employee: &NewEmployee) -> Result<(), ApiError>;
    async fn current_user(&self) -> Result<User, ApiError>;
    async fn update_current_user(&self, update: &ProfileUpdate) -> Result<User, ApiError>;
    async fn get_user(&self, id: UserId) -> Result<User, ApiError>;
    async fn update_user(&self, id: UserId, update: &ProfileUpdate) -> Result<User, ApiError>;
    async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError>;

    // stats
    async fn stats(&self, kind: StatsKind) -> Result<CategoryCounts, ApiError>;
}
