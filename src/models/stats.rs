use std::collections::BTreeMap;

/// Category key -> count, as every stats endpoint returns it
pub type CategoryCounts = BTreeMap<String, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsKind {
    ByStatus,
    ByPriority,
    ByDay,
    ByWeek,
    ByMonth,
    DeadlineOutcome,
}

impl StatsKind {
    /// Panels shown by the stats view, in display order
    pub const DASHBOARD: [StatsKind; 5] = [
        StatsKind::ByStatus,
        StatsKind::ByPriority,
        StatsKind::ByDay,
        StatsKind::ByWeek,
        StatsKind::DeadlineOutcome,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::ByStatus => "/stats/tasks-by-status",
            Self::ByPriority => "/stats/tasks-by-priority",
            Self::ByDay => "/stats/tasks-by-day",
            Self::ByWeek => "/stats/tasks-by-week",
            Self::ByMonth => "/stats/tasks-by-month",
            Self::DeadlineOutcome => "/stats/completed-before-after-deadline",
        }
    }

    pub fn title_key(&self) -> &'static str {
        match self {
            Self::ByStatus => "stats_by_status",
            Self::ByPriority => "stats_by_priority",
            Self::ByDay => "stats_by_day",
            Self::ByWeek => "stats_by_week",
            Self::ByMonth => "stats_by_month",
            Self::DeadlineOutcome => "stats_deadline",
        }
    }

    /// Time series are drawn as sparklines, categories as bars
    pub fn is_series(&self) -> bool {
        matches!(self, Self::ByDay | Self::ByWeek | Self::ByMonth)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "status" => Some(Self::ByStatus),
            "priority" => Some(Self::ByPriority),
            "day" => Some(Self::ByDay),
            "week" => Some(Self::ByWeek),
            "month" => Some(Self::ByMonth),
            "deadline" => Some(Self::DeadlineOutcome),
            _ => None,
        }
    }
}
