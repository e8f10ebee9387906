use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::user::UserId;

pub type TaskId = u64;

/// Board column a task sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    Closed,
}

impl TaskStatus {
    /// Column order on the board
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Closed => "CLOSED",
        }
    }

    pub fn column(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn from_column(column: usize) -> Option<Self> {
        Self::ALL.get(column).copied()
    }

    /// i18n key for the status label
    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "TODO" | "TO_DO" => Ok(Self::Todo),
            "IN_PROGRESS" | "DOING" => Ok(Self::InProgress),
            "COMPLETED" | "DONE" => Ok(Self::Completed),
            "CLOSED" => Ok(Self::Closed),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" | "MID" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// A task as the backend returns it.
///
/// Fields the client does not model are kept in `extra` so that writing a
/// fetched task back does not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "taskId", alias = "id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_duration: Option<f64>,
    #[serde(default)]
    pub actual_duration: Option<f64>,
    #[serde(default)]
    pub assigned_employee_id: Option<UserId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// First `word_limit` words of the description, with "..." when cut
    pub fn short_description(&self, word_limit: usize) -> String {
        let words: Vec<&str> = self.description.split_whitespace().collect();
        if words.len() <= word_limit {
            return words.join(" ");
        }
        format!("{}...", words[..word_limit].join(" "))
    }

    pub fn is_assigned_to(&self, user_id: UserId) -> bool {
        self.assigned_employee_id == Some(user_id)
    }
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub deadline: NaiveDate,
    pub estimated_duration: f64,
    pub actual_duration: Option<f64>,
    pub assigned_employee_id: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "taskId": 1,
            "title": "Write report",
            "description": "Quarterly numbers for the board meeting",
            "status": "TODO",
            "priority": "HIGH",
            "deadline": "2025-06-30",
            "estimatedDuration": 4,
            "actualDuration": null,
            "assignedEmployeeId": 7,
            "createdAt": "2025-06-01T09:00:00"
        }"#
    }

    #[test]
    fn test_parse_backend_task() {
        let task: Task = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.deadline, NaiveDate::from_ymd_opt(2025, 6, 30));
        assert_eq!(task.estimated_duration, Some(4.0));
        assert_eq!(task.actual_duration, None);
        assert!(task.is_assigned_to(7));
        assert!(task.extra.contains_key("createdAt"));
    }

    #[test]
    fn test_null_description_reads_as_empty() {
        let json = r#"[
            {"taskId": 1, "title": "A", "description": null, "status": "TODO", "priority": "LOW"},
            {"taskId": 2, "title": "B", "status": "COMPLETED", "priority": "HIGH"}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "");
        assert_eq!(tasks[0].short_description(10), "");
        assert_eq!(tasks[1].description, "");
    }

    #[test]
    fn test_unknown_fields_are_written_back() {
        let task: Task = serde_json::from_str(sample_json()).unwrap();
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["taskId"], 1);
        assert_eq!(value["status"], "TODO");
        assert_eq!(value["assignedEmployeeId"], 7);
        assert_eq!(value["createdAt"], "2025-06-01T09:00:00");
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("IN_PROGRESS".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("done".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("archived".parse::<TaskStatus>().is_err());
        assert_eq!(TaskStatus::from_column(3), Some(TaskStatus::Closed));
        assert_eq!(TaskStatus::from_column(4), None);
        assert_eq!(TaskStatus::Completed.column(), 2);
    }

    #[test]
    fn test_short_description() {
        let mut task: Task = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(task.short_description(10), "Quarterly numbers for the board meeting");
        assert_eq!(task.short_description(2), "Quarterly numbers...");
        task.description.clear();
        assert_eq!(task.short_description(10), "");
    }
}
