//! Routes and the role guard in front of them.

use crate::models::{Role, TaskId, UserId};
use crate::session::SessionState;

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const SIGNED_IN: &[Role] = &[Role::Employee, Role::Admin];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Verify { email: String },
    ForgotPassword,
    ResetPassword { token: Option<String> },
    Unauthorized,
    AdminDashboard,
    EmployeeDashboard,
    Tasks,
    MyTasks,
    TaskDetail(TaskId),
    TaskCreate,
    Employees,
    AddEmployee,
    EmployeeProfile(UserId),
    Profile,
    Stats,
}

impl Route {
    /// Roles admitted to the route; `None` for public routes
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::Login
            | Self::Signup
            | Self::Verify { .. }
            | Self::ForgotPassword
            | Self::ResetPassword { .. }
            | Self::Unauthorized => None,
            Self::EmployeeDashboard
            | Self::Tasks
            | Self::MyTasks
            | Self::TaskDetail(_)
            | Self::Profile => Some(SIGNED_IN),
            Self::AdminDashboard
            | Self::TaskCreate
            | Self::Employees
            | Self::AddEmployee
            | Self::EmployeeProfile(_)
            | Self::Stats => Some(ADMIN_ONLY),
        }
    }

    pub fn is_public(&self) -> bool {
        self.allowed_roles().is_none()
    }

    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Employee => Self::EmployeeDashboard,
        }
    }

    /// i18n key of the view title
    pub fn title_key(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Verify { .. } => "verify",
            Self::ForgotPassword => "forgot_password",
            Self::ResetPassword { .. } => "reset_password",
            Self::Unauthorized => "unauthorized",
            Self::AdminDashboard => "admin_dashboard",
            Self::EmployeeDashboard => "employee_dashboard",
            Self::Tasks => "tasks",
            Self::MyTasks => "my_tasks",
            Self::TaskDetail(_) => "task_details",
            Self::TaskCreate => "create_task",
            Self::Employees => "employees",
            Self::AddEmployee => "add_employee",
            Self::EmployeeProfile(_) => "employee_profile",
            Self::Profile => "profile",
            Self::Stats => "stats",
        }
    }

    /// Every route shape, with placeholder parameters
    #[cfg(test)]
    pub fn samples() -> Vec<Route> {
        vec![
            Self::Login,
            Self::Signup,
            Self::Verify {
                email: "a@b.c".into(),
            },
            Self::ForgotPassword,
            Self::ResetPassword { token: None },
            Self::Unauthorized,
            Self::AdminDashboard,
            Self::EmployeeDashboard,
            Self::Tasks,
            Self::MyTasks,
            Self::TaskDetail(1),
            Self::TaskCreate,
            Self::Employees,
            Self::AddEmployee,
            Self::EmployeeProfile(2),
            Self::Profile,
            Self::Stats,
        ]
    }
}

/// Outcome of guarding a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Session check still in flight
    Loading,
    Granted,
    RedirectLogin,
    RedirectUnauthorized,
}

pub fn check(route: &Route, state: &SessionState) -> Access {
    let Some(allowed) = route.allowed_roles() else {
        return Access::Granted;
    };

    match state {
        SessionState::Loading(_) => Access::Loading,
        SessionState::Anonymous => Access::RedirectLogin,
        SessionState::Authenticated(session) if allowed.contains(&session.role) => Access::Granted,
        SessionState::Authenticated(_) => Access::RedirectUnauthorized,
    }
}

/// What to show for a requested route: the route itself or its redirect.
/// `None` while the session is loading.
pub fn resolve(requested: &Route, state: &SessionState) -> Option<Route> {
    match check(requested, state) {
        Access::Loading => None,
        Access::Granted => Some(requested.clone()),
        Access::RedirectLogin => Some(Route::Login),
        Access::RedirectUnauthorized => Some(Route::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(Session {
            token: "t".into(),
            role,
            email: "x@example.com".into(),
            user_id: Some(1),
            username: None,
        })
    }

    #[test]
    fn test_roles_outside_allowed_set_are_redirected_to_unauthorized() {
        for route in Route::samples() {
            let Some(allowed) = route.allowed_roles() else {
                continue;
            };
            for role in [Role::Admin, Role::Employee] {
                let expected = if allowed.contains(&role) {
                    Access::Granted
                } else {
                    Access::RedirectUnauthorized
                };
                assert_eq!(check(&route, &signed_in(role)), expected, "{route:?} as {role}");
            }
        }
    }

    #[test]
    fn test_anonymous_access_redirects_to_login() {
        for route in Route::samples().into_iter().filter(|r| !r.is_public()) {
            assert_eq!(check(&route, &SessionState::Anonymous), Access::RedirectLogin);
            assert_eq!(resolve(&route, &SessionState::Anonymous), Some(Route::Login));
        }
    }

    #[test]
    fn test_public_routes_always_granted() {
        let states = [
            SessionState::Anonymous,
            SessionState::Loading(None),
            signed_in(Role::Employee),
        ];
        for route in Route::samples().into_iter().filter(Route::is_public) {
            for state in &states {
                assert_eq!(check(&route, state), Access::Granted);
            }
        }
    }

    #[test]
    fn test_loading_holds_protected_routes() {
        assert_eq!(check(&Route::Tasks, &SessionState::Loading(None)), Access::Loading);
        assert_eq!(resolve(&Route::Stats, &SessionState::Loading(None)), None);
    }

    #[test]
    fn test_employee_cannot_reach_admin_views() {
        let employee = signed_in(Role::Employee);
        assert_eq!(resolve(&Route::Stats, &employee), Some(Route::Unauthorized));
        assert_eq!(resolve(&Route::AdminDashboard, &employee), Some(Route::Unauthorized));
        assert_eq!(resolve(&Route::MyTasks, &employee), Some(Route::MyTasks));
        assert_eq!(Route::home_for(Role::Employee), Route::EmployeeDashboard);
    }
}
