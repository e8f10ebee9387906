//! Session store.
//!
//! Owns the signed-in user's token and role. State is published on a
//! `watch` channel; the HTTP client and the app read it from there and
//! nothing else touches the session file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

use crate::api::Backend;
use crate::error::ApiError;
use crate::guard::Route;
use crate::models::{Credentials, Role, SignupRequest, User, UserId, VerifyRequest};

/// Persisted credential of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub email: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Session {
    fn refreshed(mut self, user: &User) -> Self {
        if let Some(role) = user.role {
            self.role = role;
        }
        self.user_id = Some(user.id);
        self.username = Some(user.username.clone());
        if !user.email.is_empty() {
            self.email = user.email.clone();
        }
        self
    }

    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Stored token being checked against the backend
    Loading(Option<Session>),
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    /// Token to send, including while a stored one is being revalidated
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Loading(Some(session)) | Self::Authenticated(session) => {
                Some(session.token.as_str())
            }
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session().map(|s| s.role)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

/// Channel the store publishes on; starts in the loading state
pub fn channel() -> (watch::Sender<SessionState>, watch::Receiver<SessionState>) {
    watch::channel(SessionState::Loading(None))
}

/// Durable storage for the session (`session.json` in the data dir)
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::config::get_data_dir()?.join("session.json")))
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&content)?;

        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

struct Inner {
    state: watch::Sender<SessionState>,
    backend: Arc<dyn Backend>,
    file: SessionFile,
}

/// Cheap to clone; every clone shares the same state
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn new(
        state: watch::Sender<SessionState>,
        backend: Arc<dyn Backend>,
        file: SessionFile,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state,
                backend,
                file,
            }),
        }
    }

    pub fn current(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    fn publish(&self, state: SessionState) {
        self.inner.state.send_replace(state);
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.inner.file.save(session) {
            tracing::warn!(error = %e, "could not persist session");
        }
    }

    /// Revalidate the stored token, if any
    pub async fn restore(&self) -> SessionState {
        let stored = match self.inner.file.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable session file, ignoring it");
                None
            }
        };

        let Some(stored) = stored else {
            self.publish(SessionState::Anonymous);
            return SessionState::Anonymous;
        };

        self.publish(SessionState::Loading(Some(stored.clone())));

        let next = match self.inner.backend.validate_token().await {
            Ok(user) => {
                let session = stored.refreshed(&user);
                self.persist(&session);
                tracing::info!(role = %session.role, "session restored");
                SessionState::Authenticated(session)
            }
            Err(e) if e.invalidates_session() => {
                tracing::info!(error = %e, "stored token rejected, clearing session");
                if let Err(e) = self.inner.file.clear() {
                    tracing::warn!(error = %e, "could not remove session file");
                }
                SessionState::Anonymous
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not validate stored token, continuing signed out");
                SessionState::Anonymous
            }
        };

        self.publish(next.clone());
        next
    }

    /// Sign in and return the role's home route.
    ///
    /// On failure the current state and the session file are left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Route, ApiError> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.inner.backend.login(&credentials).await?;

        let mut session = Session {
            token: response.token,
            role: response.role,
            email: credentials.email,
            user_id: response.user_id,
            username: response.username,
        };

        // published before the profile lookup so that call carries the token
        self.publish(SessionState::Authenticated(session.clone()));

        if session.user_id.is_none() {
            match self.inner.backend.current_user().await {
                Ok(user) => {
                    session = session.refreshed(&user);
                    self.publish(SessionState::Authenticated(session.clone()));
                }
                Err(e) => tracing::warn!(error = %e, "could not load profile after login"),
            }
        }

        self.persist(&session);
        tracing::info!(role = %session.role, email = %session.email, "signed in");

        Ok(Route::home_for(session.role))
    }

    pub async fn signup(&self, email: &str, username: &str, password: &str) -> Result<Route, ApiError> {
        let request = SignupRequest {
            email: email.trim().to_string(),
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        self.inner.backend.signup(&request).await?;
        tracing::info!(email = %request.email, "account created, pending verification");

        Ok(Route::Verify {
            email: request.email,
        })
    }

    pub async fn verify(&self, email: &str, code: &str) -> Result<Route, ApiError> {
        let request = VerifyRequest {
            email: email.trim().to_string(),
            verification_code: code.trim().to_string(),
        };
        self.inner.backend.verify(&request).await?;
        tracing::info!(email = %request.email, "account verified");

        Ok(Route::Login)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        self.inner.backend.forgot_password(email.trim()).await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError> {
        self.inner.backend.reset_password(token.trim(), password).await
    }

    /// Forget the session and return the login route
    pub fn logout(&self) -> Route {
        if let Err(e) = self.inner.file.clear() {
            tracing::warn!(error = %e, "could not remove session file");
        }
        self.publish(SessionState::Anonymous);
        tracing::info!("signed out");
        Route::Login
    }
}
