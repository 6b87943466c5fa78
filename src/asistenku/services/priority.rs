// src/asistenku/services/priority.rs
use crate::models::task::TaskRecord;
use std::cmp::Ordering;

/// Display order for the active tab: heavier request types first, then the
/// earliest effective deadline, tasks without a deadline last.
pub fn compare_priority(a: &TaskRecord, b: &TaskRecord) -> Ordering {
    b.request_type
        .weight()
        .cmp(&a.request_type.weight())
        .then_with(|| compare_deadlines(a.effective_deadline(), b.effective_deadline()))
}

fn compare_deadlines(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts in place. `sort_by` is stable, so equal tasks keep input order.
pub fn sort_by_priority(tasks: &mut [TaskRecord]) {
    tasks.sort_by(compare_priority);
}

pub fn sorted_by_priority(mut tasks: Vec<TaskRecord>) -> Vec<TaskRecord> {
    sort_by_priority(&mut tasks);
    tasks
}
