use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::watch;

use super::Backend;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    CategoryCounts, Credentials, EmployeeSummary, LoginResponse, NewEmployee, PasswordChange,
    ProfileUpdate, ResetPasswordRequest, SignupRequest, StatsKind, Task, TaskDraft, TaskId, User,
    UserId, VerifyRequest,
};
use crate::session::SessionState;

/// reqwest-backed client for the task backend.
///
/// The bearer token is read from the session store's channel on every
/// request, so a login or logout is picked up without rebuilding the client.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    session: watch::Receiver<SessionState>,
}

impl HttpBackend {
    pub fn new(config: &Config, session: watch::Receiver<SessionState>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer` when a token is known
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.session.borrow().token().map(str::to_owned);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), error = %err, "request failed");
        Err(err)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await?;
        Ok(())
    }

    async fn text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = self.send(request).await?;
        Ok(response.text().await?)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        tracing::debug!(path, "GET");
        self.authorized(self.client.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        tracing::debug!(path, "POST");
        self.authorized(self.client.post(self.url(path)))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        tracing::debug!(path, "PUT");
        self.authorized(self.client.put(self.url(path)))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        tracing::debug!(path, "DELETE");
        self.authorized(self.client.delete(self.url(path)))
    }

    /// Auth calls go out without a token
    fn public_post(&self, path: &str) -> RequestBuilder {
        tracing::debug!(path, "POST (public)");
        self.client.post(self.url(path))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.json(self.public_post("/auth/login").json(credentials)).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        self.empty(self.public_post("/auth/signup").json(request)).await
    }

    async fn verify(&self, request: &VerifyRequest) -> Result<(), ApiError> {
        self.empty(self.public_post("/auth/verify").json(request)).await
    }

    async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        self.text(self.public_post("/auth/forgot_password").query(&[("email", email)]))
            .await
    }

    async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError> {
        let body = ResetPasswordRequest {
            password: password.to_string(),
        };
        self.text(
            self.public_post("/auth/reset_password")
                .query(&[("token", token)])
                .json(&body),
        )
        .await
    }

    async fn validate_token(&self) -> Result<User, ApiError> {
        if self.session.borrow().token().is_none() {
            return Err(ApiError::NoSession);
        }
        self.json(self.get("/auth/validate")).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.json(self.get("/tasks/all")).await
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        self.json(self.get(&format!("/tasks/{id}"))).await
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        self.empty(self.post("/tasks/add").json(draft)).await
    }

    async fn update_task(&self, task: &Task) -> Result<(), ApiError> {
        self.empty(self.post(&format!("/tasks/update/{}", task.id)).json(task))
            .await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.empty(self.delete(&format!("/tasks/delete/{id}"))).await
    }

    async fn list_employees(&self) -> Result<Vec<User>, ApiError> {
        self.json(self.get("/users/employees")).await
    }

    async fn employee_summaries(&self) -> Result<Vec<EmployeeSummary>, ApiError> {
        self.json(self.get("/employees/summary")).await
    }

    async fn add_employee(&self, employee: &NewEmployee) -> Result<(), ApiError> {
        self.empty(self.post("/employees/add").json(employee)).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.json(self.get("/users/me")).await
    }

    async fn update_current_user(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.json(self.put("/users/update").json(update)).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.json(self.get(&format!("/users/{id}"))).await
    }

    async fn update_user(&self, id: UserId, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.json(self.put(&format!("/users/update/{id}")).json(update))
            .await
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        self.empty(self.put("/users/change-password").json(change)).await
    }

    async fn stats(&self, kind: StatsKind) -> Result<CategoryCounts, ApiError> {
        self.json(self.get(kind.path())).await
    }
}
