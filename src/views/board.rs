//! Kanban board: one column per status, cards moved with an optimistic
//! update that is reverted when the backend refuses it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

use super::Load;
use crate::api::Backend;
use crate::error::ApiError;
use crate::i18n::{t, Language};
use crate::models::{username_of, Task, TaskId, TaskStatus, User};
use crate::session::Session;

/// Who may move a card between columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovePolicy {
    /// Only the assigned employee, whatever their role
    #[default]
    AssigneeOnly,
    Unrestricted,
}

impl MovePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssigneeOnly => "assignee-only",
            Self::Unrestricted => "unrestricted",
        }
    }
}

impl FromStr for MovePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "assignee-only" => Ok(Self::AssigneeOnly),
            "unrestricted" => Ok(Self::Unrestricted),
            other => Err(format!("unknown move policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejected {
    #[error("board not loaded")]
    NotLoaded,
    #[error("no such task")]
    UnknownTask,
    #[error("task is already in that column")]
    SameColumn,
    #[error("only the assignee can move this task")]
    NotAssignee,
    #[error("a move of this task is already in progress")]
    AlreadyMoving,
}

impl MoveRejected {
    /// Notification shown for the rejection, if it deserves one
    pub fn notice_key(&self) -> Option<&'static str> {
        match self {
            Self::NotAssignee => Some("not_assignee"),
            _ => None,
        }
    }
}

/// A move applied locally and waiting for the backend
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
    /// Task as fetched with only the status replaced
    pub payload: Task,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardData {
    pub tasks: Vec<Task>,
    pub employees: Vec<User>,
}

pub struct BoardView {
    pub data: Load<BoardData>,
    pub policy: MovePolicy,
    pub column: usize,
    rows: [usize; 4],
    moving: HashSet<TaskId>,
}

impl BoardView {
    pub fn new(policy: MovePolicy) -> Self {
        Self {
            data: Load::Loading,
            policy,
            column: 0,
            rows: [0; 4],
            moving: HashSet::new(),
        }
    }

    pub fn loaded(&mut self, result: Result<BoardData, ApiError>) {
        self.data = Load::from_result(result);
        self.clamp_rows();
    }

    /// Cards of one column, in fetched order
    pub fn column_tasks(&self, status: TaskStatus) -> Vec<&Task> {
        match self.data.ready() {
            Some(data) => data.tasks.iter().filter(|t| t.status == status).collect(),
            None => Vec::new(),
        }
    }

    pub fn selected_row(&self, column: usize) -> usize {
        self.rows.get(column).copied().unwrap_or(0)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let status = TaskStatus::from_column(self.column)?;
        self.column_tasks(status)
            .get(self.selected_row(self.column))
            .copied()
    }

    pub fn is_moving(&self, id: TaskId) -> bool {
        self.moving.contains(&id)
    }

    pub fn select_column(&mut self, step: isize) {
        let last = TaskStatus::ALL.len() as isize - 1;
        self.column = (self.column as isize + step).clamp(0, last) as usize;
    }

    pub fn select_row(&mut self, step: isize) {
        let Some(status) = TaskStatus::from_column(self.column) else {
            return;
        };
        let count = self.column_tasks(status).len() as isize;
        if count == 0 {
            return;
        }
        let row = &mut self.rows[self.column];
        *row = (*row as isize + step).clamp(0, count - 1) as usize;
    }

    fn clamp_rows(&mut self) {
        for status in TaskStatus::ALL {
            let count = self.column_tasks(status).len();
            let row = &mut self.rows[status.column()];
            *row = (*row).min(count.saturating_sub(1));
        }
    }

    /// Put the selection on `id`, wherever it sits now
    fn follow(&mut self, id: TaskId) {
        let Some(task) = self.task(id) else {
            return;
        };
        let status = task.status;
        let row = self
            .column_tasks(status)
            .iter()
            .position(|t| t.id == id)
            .unwrap_or(0);
        self.column = status.column();
        self.rows[self.column] = row;
    }

    fn task(&self, id: TaskId) -> Option<&Task> {
        self.data.ready()?.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.data.ready_mut()?.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Validate a move and apply it locally.
    ///
    /// Nothing changes when the move is rejected.
    pub fn begin_move(
        &mut self,
        task_id: TaskId,
        to: TaskStatus,
        actor: Option<&Session>,
    ) -> Result<PendingMove, MoveRejected> {
        let policy = self.policy;
        if self.data.ready().is_none() {
            return Err(MoveRejected::NotLoaded);
        }
        let task = self.task(task_id).ok_or(MoveRejected::UnknownTask)?;

        if task.status == to {
            return Err(MoveRejected::SameColumn);
        }
        if policy == MovePolicy::AssigneeOnly {
            let owner = actor
                .and_then(|s| s.user_id)
                .is_some_and(|uid| task.is_assigned_to(uid));
            if !owner {
                return Err(MoveRejected::NotAssignee);
            }
        }
        if self.moving.contains(&task_id) {
            return Err(MoveRejected::AlreadyMoving);
        }

        let from = task.status;
        let mut payload = task.clone();
        payload.status = to;

        if let Some(task) = self.task_mut(task_id) {
            task.status = to;
        }
        self.moving.insert(task_id);
        self.follow(task_id);
        self.clamp_rows();
        tracing::debug!(task = task_id, %from, %to, "optimistic move");

        Ok(PendingMove {
            task_id,
            from,
            to,
            payload,
        })
    }

    /// Move the selected card to `to`
    pub fn move_selected(
        &mut self,
        to: TaskStatus,
        actor: Option<&Session>,
    ) -> Result<PendingMove, MoveRejected> {
        let id = self.selected_task().map(|t| t.id).ok_or(MoveRejected::UnknownTask)?;
        self.begin_move(id, to, actor)
    }

    /// Move the selected card one column left or right
    pub fn shift_selected(
        &mut self,
        step: isize,
        actor: Option<&Session>,
    ) -> Result<PendingMove, MoveRejected> {
        let target = (self.column as isize + step).clamp(0, TaskStatus::ALL.len() as isize - 1);
        let to = TaskStatus::from_column(target as usize).ok_or(MoveRejected::SameColumn)?;
        self.move_selected(to, actor)
    }

    /// Apply the backend's answer. Returns true when the move was reverted.
    pub fn settle_move(&mut self, pending: &PendingMove, result: &Result<(), ApiError>) -> bool {
        self.moving.remove(&pending.task_id);

        let Err(e) = result else {
            tracing::info!(task = pending.task_id, to = %pending.to, "move saved");
            return false;
        };

        tracing::warn!(task = pending.task_id, error = %e, "move failed, reverting");
        let selected = self.selected_task().map(|t| t.id);
        let reverted = match self.task_mut(pending.task_id) {
            Some(task) if task.status == pending.to => {
                task.status = pending.from;
                true
            }
            _ => false,
        };
        if selected == Some(pending.task_id) {
            self.follow(pending.task_id);
        }
        self.clamp_rows();
        reverted
    }

    /// Assignee username, or the "unassigned" label when it does not resolve
    pub fn assignee_label(&self, task: &Task, lang: Language) -> String {
        let employees = self
            .data
            .ready()
            .map(|d| d.employees.as_slice())
            .unwrap_or_default();
        username_of(employees, task.assigned_employee_id)
            .map(str::to_string)
            .unwrap_or_else(|| t(lang, "unassigned").to_string())
    }
}

pub async fn fetch_board(backend: &dyn Backend) -> Result<BoardData, ApiError> {
    let (tasks, employees) = tokio::try_join!(backend.list_tasks(), backend.list_employees())?;
    Ok(BoardData { tasks, employees })
}

/// Send the update for a move
pub async fn commit_move(backend: &dyn Backend, pending: &PendingMove) -> Result<(), ApiError> {
    backend.update_task(&pending.payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{self, FakeBackend};
    use crate::models::Role;

    fn actor(user_id: u64, role: Role) -> Session {
        Session {
            token: "t".into(),
            role,
            email: "e@example.com".into(),
            user_id: Some(user_id),
            username: None,
        }
    }

    fn board_with(tasks: Vec<Task>, policy: MovePolicy) -> BoardView {
        let mut board = BoardView::new(policy);
        board.loaded(Ok(BoardData {
            tasks,
            employees: vec![fake::user(7, "alice", Role::Employee)],
        }));
        board
    }

    #[test]
    fn test_non_assignee_move_is_rejected_locally() {
        let mut board = board_with(
            vec![fake::task(1, TaskStatus::Todo, Some(7))],
            MovePolicy::AssigneeOnly,
        );

        let err = board
            .begin_move(1, TaskStatus::InProgress, Some(&actor(8, Role::Admin)))
            .unwrap_err();
        assert_eq!(err, MoveRejected::NotAssignee);
        assert_eq!(board.column_tasks(TaskStatus::Todo).len(), 1);
        assert!(!board.is_moving(1));

        // unassigned cards belong to nobody
        let mut board = board_with(vec![fake::task(2, TaskStatus::Todo, None)], MovePolicy::AssigneeOnly);
        assert!(board
            .begin_move(2, TaskStatus::Completed, Some(&actor(7, Role::Employee)))
            .is_err());
        assert!(board.begin_move(2, TaskStatus::Completed, None).is_err());
    }

    #[tokio::test]
    async fn test_assignee_move_sends_one_update_with_fetched_fields() {
        let mut fetched = fake::task(1, TaskStatus::Todo, Some(7));
        fetched
            .extra
            .insert("createdAt".into(), serde_json::json!("2025-06-01T09:00:00"));
        let backend = FakeBackend::new().with_tasks(vec![fetched.clone()]);
        let mut board = board_with(vec![fetched.clone()], MovePolicy::AssigneeOnly);

        let pending = board
            .begin_move(1, TaskStatus::InProgress, Some(&actor(7, Role::Employee)))
            .unwrap();
        // applied before the request resolves
        assert_eq!(board.column_tasks(TaskStatus::InProgress).len(), 1);
        assert!(board.is_moving(1));
        assert_eq!(board.selected_task().map(|t| t.id), Some(1));

        let result = commit_move(&backend, &pending).await;
        assert!(!board.settle_move(&pending, &result));

        assert_eq!(backend.count("update_task"), 1);
        let sent = backend.updates.lock().unwrap()[0].clone();
        let mut expected = fetched;
        expected.status = TaskStatus::InProgress;
        assert_eq!(sent, expected);
        assert!(!board.is_moving(1));
    }

    #[tokio::test]
    async fn test_failed_move_is_reverted() {
        let backend = FakeBackend::new().failing_updates(ApiError::Network("refused".into()));
        let mut board = board_with(
            vec![fake::task(1, TaskStatus::Todo, Some(7))],
            MovePolicy::AssigneeOnly,
        );

        let pending = board
            .begin_move(1, TaskStatus::Closed, Some(&actor(7, Role::Employee)))
            .unwrap();
        let result = commit_move(&backend, &pending).await;
        assert!(board.settle_move(&pending, &result));

        assert_eq!(board.column_tasks(TaskStatus::Todo).len(), 1);
        assert!(board.column_tasks(TaskStatus::Closed).is_empty());
        assert_eq!(board.column, 0);
    }

    #[test]
    fn test_same_column_and_second_move_rejected() {
        let mut board = board_with(
            vec![fake::task(1, TaskStatus::Todo, Some(7))],
            MovePolicy::Unrestricted,
        );
        assert_eq!(
            board.begin_move(1, TaskStatus::Todo, None),
            Err(MoveRejected::SameColumn)
        );
        assert!(board.begin_move(1, TaskStatus::InProgress, None).is_ok());
        assert_eq!(
            board.begin_move(1, TaskStatus::Completed, None),
            Err(MoveRejected::AlreadyMoving)
        );
        assert_eq!(
            board.begin_move(9, TaskStatus::Completed, None),
            Err(MoveRejected::UnknownTask)
        );
    }

    #[test]
    fn test_selection_and_shift() {
        let mut board = board_with(
            vec![
                fake::task(1, TaskStatus::Todo, Some(7)),
                fake::task(2, TaskStatus::Todo, Some(7)),
                fake::task(3, TaskStatus::Completed, None),
            ],
            MovePolicy::AssigneeOnly,
        );
        board.select_row(1);
        board.select_row(5);
        assert_eq!(board.selected_task().map(|t| t.id), Some(2));

        let pending = board.shift_selected(1, Some(&actor(7, Role::Employee))).unwrap();
        assert_eq!(pending.to, TaskStatus::InProgress);
        assert_eq!(board.column, 1);

        board.select_column(-3);
        assert_eq!(board.column, 0);
        assert_eq!(board.selected_task().map(|t| t.id), Some(1));
    }

    #[test]
    fn test_assignee_label_falls_back_to_unassigned() {
        let board = board_with(vec![], MovePolicy::AssigneeOnly);
        let mine = fake::task(1, TaskStatus::Todo, Some(7));
        let ghost = fake::task(2, TaskStatus::Todo, Some(99));
        assert_eq!(board.assignee_label(&mine, Language::En), "alice");
        assert_eq!(board.assignee_label(&ghost, Language::En), "Unassigned");
        assert_eq!(board.assignee_label(&ghost, Language::Fr), "Non assignée");
    }

    #[test]
    fn test_move_policy_round_trip_names() {
        assert_eq!("unrestricted".parse::<MovePolicy>(), Ok(MovePolicy::Unrestricted));
        assert_eq!(MovePolicy::default().as_str(), "assignee-only");
    }
}
