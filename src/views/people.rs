//! Employee management and the signed-in user's profile.

use super::form::{Field, Form};
use super::Load;
use crate::error::{ApiError, FormError};
use crate::i18n::Language;
use crate::models::{EmployeeSummary, NewEmployee, PasswordChange, ProfileUpdate, User, UserId};

pub struct EmployeesView {
    pub summaries: Load<Vec<EmployeeSummary>>,
    pub selected: usize,
}

impl EmployeesView {
    pub fn new() -> Self {
        Self {
            summaries: Load::Loading,
            selected: 0,
        }
    }

    pub fn loaded(&mut self, result: Result<Vec<EmployeeSummary>, ApiError>) {
        self.summaries = Load::from_result(result);
        let count = self.summaries.ready().map_or(0, Vec::len);
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    pub fn select(&mut self, step: isize) {
        let count = self.summaries.ready().map_or(0, Vec::len) as isize;
        if count > 0 {
            self.selected = (self.selected as isize + step).clamp(0, count - 1) as usize;
        }
    }

    /// Id of the highlighted employee, when the summary carries one
    pub fn selected_id(&self) -> Option<UserId> {
        self.summaries.ready()?.get(self.selected)?.id
    }
}

impl Default for EmployeesView {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AddEmployeeView {
    pub form: Form,
    pub submitting: bool,
}

impl AddEmployeeView {
    pub fn new(lang: Language) -> Self {
        Self {
            form: Form::new(
                lang,
                vec![
                    Field::text("username", "username").required(),
                    Field::text("email", "email").required(),
                    Field::secret("password", "password").required(),
                ],
            ),
            submitting: false,
        }
    }

    pub fn employee(&self) -> Result<NewEmployee, FormError> {
        self.form.check_required()?;
        Ok(NewEmployee {
            username: self.form.text("username").unwrap_or_default(),
            email: self.form.text("email").unwrap_or_default(),
            password: self.form.value("password"),
        })
    }

    /// The form is left empty for the next entry
    pub fn added(&mut self) {
        self.form.clear();
        self.submitting = false;
    }
}

pub struct EmployeeProfileView {
    pub id: UserId,
    pub user: Load<User>,
}

impl EmployeeProfileView {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            user: Load::Loading,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    Viewing,
    Editing,
    ChangingPassword,
}

pub struct ProfileView {
    pub user: Load<User>,
    pub mode: ProfileMode,
    pub edit_form: Form,
    pub password_form: Form,
    pub submitting: bool,
}

impl ProfileView {
    pub fn new(lang: Language) -> Self {
        Self {
            user: Load::Loading,
            mode: ProfileMode::Viewing,
            edit_form: Form::new(
                lang,
                vec![
                    Field::text("username", "username").required(),
                    Field::text("email", "email").required(),
                ],
            ),
            password_form: Form::new(
                lang,
                vec![
                    Field::secret("current", "current_password").required(),
                    Field::secret("new", "new_password").required(),
                    Field::secret("confirm", "confirm_password").required(),
                ],
            ),
            submitting: false,
        }
    }

    pub fn active_form_mut(&mut self) -> Option<&mut Form> {
        match self.mode {
            ProfileMode::Viewing => None,
            ProfileMode::Editing => Some(&mut self.edit_form),
            ProfileMode::ChangingPassword => Some(&mut self.password_form),
        }
    }

    /// Open the edit form prefilled with the loaded profile
    pub fn start_edit(&mut self) {
        let Some(user) = self.user.ready() else {
            return;
        };
        let (username, email) = (user.username.clone(), user.email.clone());
        self.edit_form.set_value("username", &username);
        self.edit_form.set_value("email", &email);
        self.edit_form.focused = 0;
        self.mode = ProfileMode::Editing;
    }

    pub fn start_password_change(&mut self) {
        if self.user.ready().is_some() {
            self.password_form.clear();
            self.mode = ProfileMode::ChangingPassword;
        }
    }

    pub fn cancel(&mut self) {
        self.mode = ProfileMode::Viewing;
        self.submitting = false;
    }

    pub fn profile_update(&self) -> Result<ProfileUpdate, FormError> {
        self.edit_form.check_required()?;
        Ok(ProfileUpdate {
            username: self.edit_form.text("username").unwrap_or_default(),
            email: self.edit_form.text("email").unwrap_or_default(),
        })
    }

    pub fn password_change(&self) -> Result<PasswordChange, FormError> {
        self.password_form.check_required()?;
        let new_password = self.password_form.value("new");
        if new_password != self.password_form.value("confirm") {
            return Err(FormError::PasswordMismatch);
        }
        Ok(PasswordChange {
            current_password: self.password_form.value("current"),
            new_password,
        })
    }

    pub fn saved(&mut self, user: User) {
        self.user = Load::Ready(user);
        self.cancel();
    }
}
