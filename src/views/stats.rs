//! Statistics dashboard: one panel per aggregate endpoint.

use super::Load;
use crate::error::ApiError;
use crate::i18n::{category_label, Language};
use crate::models::{CategoryCounts, Priority, StatsKind, TaskStatus};

pub struct StatPanel {
    pub kind: StatsKind,
    pub data: Load<CategoryCounts>,
}

/// Labelled values ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: StatsKind,
    pub points: Vec<(String, u64)>,
}

impl ChartData {
    pub fn max(&self) -> u64 {
        self.points.iter().map(|(_, v)| *v).max().unwrap_or(0)
    }
}

/// Known categories first, in their natural order, then whatever else came
/// back. Series keys that are plain numbers (week numbers) sort numerically.
fn ordered(kind: StatsKind, counts: &CategoryCounts) -> Vec<(&str, u64)> {
    let known: Vec<&str> = match kind {
        StatsKind::ByStatus => TaskStatus::ALL.iter().map(|s| s.as_str()).collect(),
        StatsKind::ByPriority => Priority::ALL.iter().map(|p| p.as_str()).collect(),
        StatsKind::DeadlineOutcome => vec!["BeforeDeadline", "AfterDeadline"],
        StatsKind::ByDay | StatsKind::ByWeek | StatsKind::ByMonth => Vec::new(),
    };

    let mut points: Vec<(&str, u64)> = known
        .iter()
        .filter_map(|key| counts.get_key_value(*key).map(|(k, v)| (k.as_str(), *v)))
        .collect();
    let mut rest: Vec<(&str, u64)> = counts
        .iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    if kind.is_series() {
        // numbers before anything else; ISO dates already sort as text
        rest.sort_by_key(|(k, _)| (k.trim().parse::<i64>().map_err(|_| *k), *k));
    }
    points.extend(rest);
    points
}

impl StatPanel {
    pub fn new(kind: StatsKind) -> Self {
        Self {
            kind,
            data: Load::Loading,
        }
    }

    /// `None` means there is nothing to plot
    pub fn chart(&self, lang: Language) -> Option<ChartData> {
        let counts = self.data.ready()?;
        if counts.is_empty() {
            return None;
        }
        Some(ChartData {
            kind: self.kind,
            points: ordered(self.kind, counts)
                .into_iter()
                .map(|(key, value)| (category_label(lang, self.kind, key).into_owned(), value))
                .collect(),
        })
    }
}

pub struct StatsView {
    pub panels: Vec<StatPanel>,
    pub selected: usize,
}

impl StatsView {
    pub fn new() -> Self {
        Self {
            panels: StatsKind::DASHBOARD.iter().copied().map(StatPanel::new).collect(),
            selected: 0,
        }
    }

    /// Each panel settles on its own
    pub fn loaded(&mut self, kind: StatsKind, result: Result<CategoryCounts, ApiError>) {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.kind == kind) {
            panel.data = Load::from_result(result);
        }
    }

    pub fn select(&mut self, step: isize) {
        let last = self.panels.len() as isize - 1;
        self.selected = (self.selected as isize + step).clamp(0, last.max(0)) as usize;
    }
}

impl Default for StatsView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> CategoryCounts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_map_has_no_chart() {
        let mut view = StatsView::new();
        view.loaded(StatsKind::ByWeek, Ok(CategoryCounts::new()));
        let panel = view.panels.iter().find(|p| p.kind == StatsKind::ByWeek).unwrap();
        assert_eq!(panel.chart(Language::En), None);
    }

    #[test]
    fn test_loading_or_failed_has_no_chart() {
        let mut view = StatsView::new();
        view.loaded(StatsKind::ByStatus, Err(ApiError::Timeout));
        assert!(view.panels.iter().all(|p| p.chart(Language::En).is_none()));
        assert!(matches!(view.panels[0].data, Load::Failed(_)));
        assert!(view.panels[1].data.is_loading());
    }

    #[test]
    fn test_week_numbers_sort_numerically() {
        let weeks = counts(&[("2", 5), ("10", 1), ("3", 2)]);
        let keys: Vec<&str> = ordered(StatsKind::ByWeek, &weeks).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["2", "3", "10"]);

        let days = counts(&[("2025-06-10", 1), ("2025-06-02", 3)]);
        let keys: Vec<&str> = ordered(StatsKind::ByDay, &days).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["2025-06-02", "2025-06-10"]);
    }

    #[test]
    fn test_status_labels_in_column_order() {
        let mut panel = StatPanel::new(StatsKind::ByStatus);
        panel.data = Load::Ready(counts(&[("CLOSED", 1), ("TODO", 4), ("IN_PROGRESS", 2)]));
        let chart = panel.chart(Language::Fr).unwrap();
        assert_eq!(
            chart.points,
            vec![
                ("À faire".to_string(), 4),
                ("En cours".to_string(), 2),
                ("Fermée".to_string(), 1),
            ]
        );
        assert_eq!(chart.max(), 4);
    }

    #[test]
    fn test_deadline_and_raw_series_keys() {
        let mut panel = StatPanel::new(StatsKind::DeadlineOutcome);
        panel.data = Load::Ready(counts(&[("AfterDeadline", 2), ("BeforeDeadline", 5)]));
        let labels: Vec<String> = panel.chart(Language::En).unwrap().points.into_iter().map(|p| p.0).collect();
        assert_eq!(labels, vec!["Before deadline", "After deadline"]);

        let mut panel = StatPanel::new(StatsKind::ByDay);
        panel.data = Load::Ready(counts(&[("2025-06-02", 1), ("2025-06-01", 3)]));
        let chart = panel.chart(Language::En).unwrap();
        assert_eq!(chart.points[0], ("2025-06-01".to_string(), 3));
    }

    #[test]
    fn test_dashboard_has_five_panels() {
        assert_eq!(StatsView::new().panels.len(), 5);
    }
}
