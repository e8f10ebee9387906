use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Employee => "EMPLOYEE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "EMPLOYEE" => Ok(Self::Employee),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, alias = "firstname", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastname", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Username lookup used wherever a task shows its assignee
pub fn username_of(users: &[User], id: Option<UserId>) -> Option<&str> {
    let id = id?;
    users
        .iter()
        .find(|u| u.id == id)
        .map(|u| u.username.as_str())
}

/// Row of the employee management table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    #[serde(default)]
    pub id: Option<UserId>,
    pub username: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default)]
    pub total_tasks: u64,
    #[serde(default)]
    pub completed_tasks: u64,
    #[serde(default)]
    pub in_progress_tasks: u64,
    #[serde(default)]
    pub todo_tasks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEmployee {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_with_lowercase_names() {
        let json = r#"{"id": 3, "username": "sam", "email": "sam@corp.io",
                       "role": "EMPLOYEE", "firstname": "Sam", "lastname": "Roe"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Some(Role::Employee));
        assert_eq!(user.full_name().as_deref(), Some("Sam Roe"));
    }

    #[test]
    fn test_null_email_reads_as_empty() {
        let user: User =
            serde_json::from_str(r#"{"id": 4, "username": "kim", "email": null}"#).unwrap();
        assert_eq!(user.email, "");
    }

    #[test]
    fn test_username_lookup() {
        let users = vec![User {
            id: 7,
            username: "alice".into(),
            email: String::new(),
            role: None,
            first_name: None,
            last_name: None,
        }];
        assert_eq!(username_of(&users, Some(7)), Some("alice"));
        assert_eq!(username_of(&users, Some(8)), None);
        assert_eq!(username_of(&users, None), None);
    }

    #[test]
    fn test_summary_defaults() {
        let row: EmployeeSummary =
            serde_json::from_str(r#"{"username": "bob", "totalTasks": 4}"#).unwrap();
        assert_eq!(row.total_tasks, 4);
        assert_eq!(row.completed_tasks, 0);
    }
}
