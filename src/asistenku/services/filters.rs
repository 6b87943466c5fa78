// src/asistenku/services/filters.rs
use crate::models::common::TimestampNs;
use crate::models::task::TaskRecord;

/// Inclusive time window; an open side is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<TimestampNs>,
    pub to: Option<TimestampNs>,
}

impl DateRange {
    pub fn new(from: Option<TimestampNs>, to: Option<TimestampNs>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, at: TimestampNs) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

pub fn created_within<'a>(tasks: &'a [TaskRecord], range: DateRange) -> Vec<&'a TaskRecord> {
    tasks.iter().filter(|t| range.contains(t.created_at)).collect()
}

/// Tasks whose effective deadline falls in the range. Tasks without a
/// deadline only pass an unbounded range.
pub fn due_within<'a>(tasks: &'a [TaskRecord], range: DateRange) -> Vec<&'a TaskRecord> {
    tasks
        .iter()
        .filter(|t| match t.effective_deadline() {
            Some(deadline) => range.contains(deadline),
            None => range.is_unbounded(),
        })
        .collect()
}

/// Unfinished tasks whose effective deadline is already behind `now`.
pub fn overdue(tasks: &[TaskRecord], now: TimestampNs) -> Vec<&TaskRecord> {
    tasks
        .iter()
        .filter(|t| !t.is_done() && t.effective_deadline().is_some_and(|d| d < now))
        .collect()
}

/// Case-insensitive title search; an empty query matches everything.
pub fn search_title<'a>(tasks: &'a [TaskRecord], query: &str) -> Vec<&'a TaskRecord> {
    let needle = query.trim().to_lowercase();
    tasks
        .iter()
        .filter(|t| needle.is_empty() || t.title.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{RequestType, TaskStatusInternal};
    use crate::services::priority::tests::task;

    fn created(id: &str, at: u64) -> TaskRecord {
        let mut t = task(id, RequestType::Normal, None, None);
        t.created_at = at;
        t
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let tasks = vec![created("a", 10), created("b", 20), created("c", 30)];
        let picked: Vec<&str> = created_within(&tasks, DateRange::new(Some(10), Some(20)))
            .iter()
            .map(|t| t.task_id.as_str())
            .collect();
        assert_eq!(picked, vec!["a", "b"]);
        assert_eq!(created_within(&tasks, DateRange::default()).len(), 3);
        assert_eq!(created_within(&tasks, DateRange::new(Some(25), None)).len(), 1);
    }

    #[test]
    fn deadline_filter_skips_undated_tasks_when_bounded() {
        let tasks = vec![
            task("dated", RequestType::Normal, Some(50), None),
            task("undated", RequestType::Normal, None, None),
        ];
        assert_eq!(due_within(&tasks, DateRange::new(None, Some(60))).len(), 1);
        assert_eq!(due_within(&tasks, DateRange::default()).len(), 2);
    }

    #[test]
    fn done_tasks_are_never_overdue() {
        let mut done = task("done", RequestType::Normal, Some(5), None);
        done.status_internal = TaskStatusInternal::Done;
        let late = task("late", RequestType::Normal, None, Some(5));
        let future = task("future", RequestType::Normal, Some(500), None);
        let tasks = vec![done, late, future];
        let hits: Vec<&str> = overdue(&tasks, 100).iter().map(|t| t.task_id.as_str()).collect();
        assert_eq!(hits, vec!["late"]);
    }

    #[test]
    fn title_search_ignores_case() {
        let mut invoice = task("1", RequestType::Normal, None, None);
        invoice.title = "Fix Invoice".to_string();
        let other = task("2", RequestType::Normal, None, None);
        let tasks = vec![invoice, other];
        assert_eq!(search_title(&tasks, "invoice").len(), 1);
        assert_eq!(search_title(&tasks, "  ").len(), 2);
    }
}
