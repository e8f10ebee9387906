//! Sign in, sign up, verification and password recovery forms.

use super::form::{Field, Form};
use crate::error::{ApiError, FormError};
use crate::guard::Route;
use crate::i18n::{t, Language};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Signup,
    Verify,
    ForgotPassword,
    ResetPassword,
}

impl AuthKind {
    pub fn title_key(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Verify => "verify",
            Self::ForgotPassword => "forgot_password",
            Self::ResetPassword => "reset_password",
        }
    }
}

/// Validated form content, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    Login { email: String, password: String },
    Signup { email: String, username: String, password: String },
    Verify { email: String, code: String },
    ForgotPassword { email: String },
    ResetPassword { token: String, password: String },
}

/// Where to go after a successful submit, and what to tell the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub route: Route,
    pub message: Option<String>,
}

pub struct AuthView {
    pub kind: AuthKind,
    pub form: Form,
    pub submitting: bool,
    /// Last failure, shown under the form
    pub error: Option<String>,
}

impl AuthView {
    pub fn for_route(route: &Route, lang: Language) -> Option<Self> {
        let (kind, fields) = match route {
            Route::Login => (
                AuthKind::Login,
                vec![
                    Field::text("email", "email").required(),
                    Field::secret("password", "password").required(),
                ],
            ),
            Route::Signup => (
                AuthKind::Signup,
                vec![
                    Field::text("email", "email").required(),
                    Field::text("username", "username").required(),
                    Field::secret("password", "password").required(),
                    Field::secret("confirm", "confirm_password").required(),
                ],
            ),
            Route::Verify { email } => (
                AuthKind::Verify,
                vec![
                    Field::text("email", "email").required().with_value(email),
                    Field::text("code", "verification_code").required(),
                ],
            ),
            Route::ForgotPassword => (
                AuthKind::ForgotPassword,
                vec![Field::text("email", "email").required()],
            ),
            Route::ResetPassword { token } => (
                AuthKind::ResetPassword,
                vec![
                    Field::text("token", "reset_token").with_value(token.as_deref().unwrap_or_default()),
                    Field::secret("password", "new_password").required(),
                    Field::secret("confirm", "confirm_password").required(),
                ],
            ),
            _ => return None,
        };

        let mut form = Form::new(lang, fields);
        if kind == AuthKind::Verify && form.text("email").is_some() {
            form.focus_next();
        }

        Some(Self {
            kind,
            form,
            submitting: false,
            error: None,
        })
    }

    fn confirmed_password(&self) -> Result<String, FormError> {
        let password = self.form.value("password");
        if password != self.form.value("confirm") {
            return Err(FormError::PasswordMismatch);
        }
        Ok(password)
    }

    pub fn request(&self) -> Result<AuthRequest, FormError> {
        let text = |name: &str| self.form.text(name).unwrap_or_default();

        if self.kind == AuthKind::ResetPassword && self.form.text("token").is_none() {
            return Err(FormError::MissingToken);
        }
        self.form.check_required()?;

        Ok(match self.kind {
            AuthKind::Login => AuthRequest::Login {
                email: text("email"),
                password: self.form.value("password"),
            },
            AuthKind::Signup => AuthRequest::Signup {
                email: text("email"),
                username: text("username"),
                password: self.confirmed_password()?,
            },
            AuthKind::Verify => AuthRequest::Verify {
                email: text("email"),
                code: text("code"),
            },
            AuthKind::ForgotPassword => AuthRequest::ForgotPassword {
                email: text("email"),
            },
            AuthKind::ResetPassword => AuthRequest::ResetPassword {
                token: text("token"),
                password: self.confirmed_password()?,
            },
        })
    }
}

/// Send a validated auth request through the session store
pub async fn perform(
    store: &SessionStore,
    request: AuthRequest,
    lang: Language,
) -> Result<AuthOutcome, ApiError> {
    match request {
        AuthRequest::Login { email, password } => Ok(AuthOutcome {
            route: store.login(&email, &password).await?,
            message: None,
        }),
        AuthRequest::Signup {
            email,
            username,
            password,
        } => Ok(AuthOutcome {
            route: store.signup(&email, &username, &password).await?,
            message: Some(t(lang, "signup_done").to_string()),
        }),
        AuthRequest::Verify { email, code } => Ok(AuthOutcome {
            route: store.verify(&email, &code).await?,
            message: Some(t(lang, "verify_done").to_string()),
        }),
        AuthRequest::ForgotPassword { email } => Ok(AuthOutcome {
            message: Some(store.forgot_password(&email).await?),
            route: Route::ResetPassword { token: None },
        }),
        AuthRequest::ResetPassword { token, password } => Ok(AuthOutcome {
            message: Some(store.reset_password(&token, &password).await?),
            route: Route::Login,
        }),
    }
}
