//! Searchable, filterable, paginated task list ("Tasks" and "My tasks").

use super::board::BoardData;
use super::form::{Field, Form};
use super::Load;
use crate::error::ApiError;
use crate::i18n::Language;
use crate::models::{username_of, Priority, Task, TaskStatus, UserId};

pub struct TaskListView {
    pub data: Load<BoardData>,
    pub mine_only: bool,
    /// Search box; keystrokes go to it while `searching`
    pub search: Form,
    pub searching: bool,
    pub status_filter: Option<TaskStatus>,
    pub priority_filter: Option<Priority>,
    /// Zero-based
    pub page: usize,
    pub page_size: usize,
    pub selected: usize,
    user_id: Option<UserId>,
}

impl TaskListView {
    pub fn new(lang: Language, page_size: usize, mine_only: bool, user_id: Option<UserId>) -> Self {
        Self {
            data: Load::Loading,
            mine_only,
            search: Form::new(lang, vec![Field::text("query", "search")]),
            searching: false,
            status_filter: None,
            priority_filter: None,
            page: 0,
            page_size: page_size.max(1),
            selected: 0,
            user_id,
        }
    }

    pub fn loaded(&mut self, result: Result<BoardData, ApiError>) {
        self.data = Load::from_result(result);
        self.clamp();
    }

    pub fn query(&self) -> String {
        self.search.value("query").trim().to_lowercase()
    }

    fn matches(&self, task: &Task, data: &BoardData, query: &str) -> bool {
        if self.mine_only && !self.user_id.is_some_and(|uid| task.is_assigned_to(uid)) {
            return false;
        }
        if self.status_filter.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority_filter.is_some_and(|p| p != task.priority) {
            return false;
        }
        if query.is_empty() {
            return true;
        }
        task.title.to_lowercase().contains(query)
            || username_of(&data.employees, task.assigned_employee_id)
                .is_some_and(|name| name.to_lowercase().contains(query))
    }

    /// Tasks passing every filter, in fetched order
    pub fn filtered(&self) -> Vec<&Task> {
        let Some(data) = self.data.ready() else {
            return Vec::new();
        };
        let query = self.query();
        data.tasks
            .iter()
            .filter(|t| self.matches(t, data, &query))
            .collect()
    }

    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size).max(1)
    }

    pub fn page_items(&self) -> Vec<&Task> {
        self.filtered()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.page_items().get(self.selected).copied()
    }

    pub fn select(&mut self, step: isize) {
        let count = self.page_items().len() as isize;
        if count == 0 {
            return;
        }
        self.selected = (self.selected as isize + step).clamp(0, count - 1) as usize;
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    /// Any filter change starts over from the first page
    pub fn filters_changed(&mut self) {
        self.page = 0;
        self.selected = 0;
    }

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = cycle(&TaskStatus::ALL, self.status_filter);
        self.filters_changed();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.priority_filter = cycle(&Priority::ALL, self.priority_filter);
        self.filters_changed();
    }

    pub fn reset_filters(&mut self) {
        self.search.clear();
        self.searching = false;
        self.status_filter = None;
        self.priority_filter = None;
        self.filters_changed();
    }

    fn clamp(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
        let count = self.page_items().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }
}

/// None -> first -> ... -> last -> None
fn cycle<T: Copy + PartialEq>(all: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => {
            let idx = all.iter().position(|v| *v == value)?;
            all.get(idx + 1).copied()
        }
    }
}
