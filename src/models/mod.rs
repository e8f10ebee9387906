pub mod auth;
pub mod stats;
pub mod task;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use auth::{Credentials, LoginResponse, ResetPasswordRequest, SignupRequest, VerifyRequest};
pub use stats::{CategoryCounts, StatsKind};
pub use task::{Priority, Task, TaskDraft, TaskId, TaskStatus};
pub use user::{
    username_of, EmployeeSummary, NewEmployee, PasswordChange, ProfileUpdate, Role, User, UserId,
};

/// Read an explicit `null` as the field's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
