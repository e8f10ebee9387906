//! Task create and detail/edit forms.

use super::form::{Choice, Field, Form};
use super::Load;
use crate::api::Backend;
use crate::error::{ApiError, FormError};
use crate::i18n::{t, Language};
use crate::models::{Priority, Task, TaskDraft, TaskId, TaskStatus, User, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFormMode {
    Create,
    Edit(TaskId),
}

pub struct TaskFormView {
    pub mode: TaskFormMode,
    pub is_admin: bool,
    pub load: Load<()>,
    /// Built once the data the form needs has arrived
    pub form: Option<Form>,
    /// Task as fetched, edit mode only
    pub original: Option<Task>,
    pub employees: Vec<User>,
    pub confirm_delete: bool,
    pub submitting: bool,
    lang: Language,
}

impl TaskFormView {
    pub fn new(mode: TaskFormMode, is_admin: bool, lang: Language) -> Self {
        Self {
            mode,
            is_admin,
            load: Load::Loading,
            form: None,
            original: None,
            employees: Vec::new(),
            confirm_delete: false,
            submitting: false,
            lang,
        }
    }

    /// Employees for the create form. A failed lookup still opens the form
    /// with only "Unassigned" to pick.
    pub fn employees_loaded(&mut self, result: Result<Vec<User>, ApiError>) {
        let employees = result.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load employees for the task form");
            Vec::new()
        });
        self.employees = employees;
        self.form = Some(self.build_form(None));
        self.load = Load::Ready(());
    }

    pub fn task_loaded(&mut self, result: Result<(Task, Vec<User>), ApiError>) {
        match result {
            Ok((task, employees)) => {
                self.employees = employees;
                self.form = Some(self.build_form(Some(&task)));
                self.original = Some(task);
                self.load = Load::Ready(());
            }
            Err(e) => self.load = Load::Failed(e.to_string()),
        }
    }

    fn status_choices(&self) -> Vec<Choice> {
        TaskStatus::ALL
            .iter()
            .map(|s| Choice::new(s.as_str(), t(self.lang, s.label_key())))
            .collect()
    }

    fn priority_choices(&self) -> Vec<Choice> {
        Priority::ALL
            .iter()
            .map(|p| Choice::new(p.as_str(), t(self.lang, p.label_key())))
            .collect()
    }

    fn assignee_choices(&self) -> Vec<Choice> {
        let mut choices = vec![Choice::new("", t(self.lang, "unassigned"))];
        choices.extend(
            self.employees
                .iter()
                .map(|u| Choice::new(u.id.to_string(), u.username.clone())),
        );
        choices
    }

    fn build_form(&self, task: Option<&Task>) -> Form {
        // only the actual duration stays open to non-admins
        let locked = !self.is_admin;
        let mut fields = vec![
            Field::text("title", "title").required().editable(!locked),
            Field::multiline("description", "description").editable(!locked),
            Field::date("deadline", "deadline").required().editable(!locked),
            Field::number("estimated_duration", "estimated_duration")
                .required()
                .editable(!locked),
            Field::number("actual_duration", "actual_duration"),
            Field::choice("priority", "priority", self.priority_choices()).editable(!locked),
            Field::choice("status", "status", self.status_choices()).editable(!locked),
            Field::choice("assignee", "assigned_employee", self.assignee_choices())
                .editable(!locked),
        ];

        if let Some(task) = task {
            let values = [
                ("title", task.title.clone()),
                ("description", task.description.clone()),
                ("deadline", task.deadline.map(|d| d.to_string()).unwrap_or_default()),
                ("estimated_duration", format_hours(task.estimated_duration)),
                ("actual_duration", format_hours(task.actual_duration)),
                ("priority", task.priority.as_str().to_string()),
                ("status", task.status.as_str().to_string()),
                (
                    "assignee",
                    task.assigned_employee_id.map(|id| id.to_string()).unwrap_or_default(),
                ),
            ];
            for (field, (_, value)) in fields.iter_mut().zip(values.iter()) {
                field.set_value(value);
            }
        }

        Form::new(self.lang, fields)
    }

    fn assignee(form: &Form) -> Option<UserId> {
        form.value("assignee").parse().ok()
    }

    /// Validated create payload
    pub fn draft(&self) -> Result<TaskDraft, FormError> {
        let form = self.form.as_ref().ok_or(FormError::Missing(t(self.lang, "title").to_string()))?;
        form.check_required()?;

        let deadline = form
            .date("deadline")?
            .ok_or_else(|| FormError::Missing(t(self.lang, "deadline").to_string()))?;
        let estimated_duration = form
            .number("estimated_duration")?
            .ok_or_else(|| FormError::Missing(t(self.lang, "estimated_duration").to_string()))?;

        Ok(TaskDraft {
            title: form.text("title").unwrap_or_default(),
            description: form.text("description").unwrap_or_default(),
            status: form.value("status").parse().unwrap_or(TaskStatus::Todo),
            priority: form.value("priority").parse().unwrap_or(Priority::Low),
            deadline,
            estimated_duration,
            actual_duration: form.number("actual_duration")?,
            assigned_employee_id: Self::assignee(form),
        })
    }

    /// The fetched task with the user's edits applied.
    ///
    /// Non-admins only change the actual duration; every other field goes
    /// back exactly as fetched.
    pub fn updated_task(&self) -> Result<Task, FormError> {
        let (Some(form), Some(original)) = (self.form.as_ref(), self.original.as_ref()) else {
            return Err(FormError::Missing(t(self.lang, "title").to_string()));
        };

        let mut task = original.clone();
        task.actual_duration = form.number("actual_duration")?;
        if !self.is_admin {
            return Ok(task);
        }

        form.check_required()?;
        task.title = form.text("title").unwrap_or_default();
        task.description = form.text("description").unwrap_or_default();
        task.deadline = form.date("deadline")?;
        task.estimated_duration = form.number("estimated_duration")?;
        task.priority = form.value("priority").parse().unwrap_or(task.priority);
        task.status = form.value("status").parse().unwrap_or(task.status);
        task.assigned_employee_id = Self::assignee(form);
        Ok(task)
    }

    /// Ask for delete confirmation; only admins editing a task may delete
    pub fn request_delete(&mut self) -> bool {
        if self.is_admin && matches!(self.mode, TaskFormMode::Edit(_)) && self.original.is_some() {
            self.confirm_delete = true;
        }
        self.confirm_delete
    }

    pub fn task_id(&self) -> Option<TaskId> {
        match self.mode {
            TaskFormMode::Edit(id) => Some(id),
            TaskFormMode::Create => None,
        }
    }
}

fn format_hours(hours: Option<f64>) -> String {
    hours.map(|h| h.to_string()).unwrap_or_default()
}

pub async fn fetch_for_edit(backend: &dyn Backend, id: TaskId) -> Result<(Task, Vec<User>), ApiError> {
    tokio::try_join!(backend.get_task(id), backend.list_employees())
}
