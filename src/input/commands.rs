use crate::guard::Route;

/// Everything a key sequence or a `:` command can ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    EnterCommandMode,

    // selection
    Up,
    Down,
    Left,
    Right,
    Open,

    // board
    MoveLeft,
    MoveRight,
    MoveToColumn(usize),

    // forms
    Edit,
    ChangePassword,
    NewItem,
    Delete,

    // task list
    Search,
    CycleStatusFilter,
    CyclePriorityFilter,
    ResetFilters,
    NextPage,
    PrevPage,

    // navigation
    GoTo(Route),
    Home,
    Back,
    Reload,
    Logout,
    SetLanguage(String),
}
