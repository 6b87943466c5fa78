// src/asistenku/services/triage.rs
use crate::models::task::{TaskRecord, TaskStatusInternal};
use crate::services::priority::sort_by_priority;
use crate::utils::guards::normalize_tag;
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Dashboard tab a task is shown under.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash, Copy)]
pub enum TaskBucket {
    #[serde(rename = "NEW_TASKS")]
    NewTasks,
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "QA")]
    Qa,
    #[serde(rename = "CLIENT_REVIEW")]
    ClientReview,
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl TaskBucket {
    pub const ALL: [TaskBucket; 5] = [
        TaskBucket::NewTasks,
        TaskBucket::Active,
        TaskBucket::Qa,
        TaskBucket::ClientReview,
        TaskBucket::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskBucket::NewTasks => "NEW_TASKS",
            TaskBucket::Active => "ACTIVE",
            TaskBucket::Qa => "QA",
            TaskBucket::ClientReview => "CLIENT_REVIEW",
            TaskBucket::Completed => "COMPLETED",
        }
    }
}

pub fn classify(status: TaskStatusInternal) -> TaskBucket {
    match status {
        TaskStatusInternal::Requested => TaskBucket::NewTasks,
        TaskStatusInternal::InProgress => TaskBucket::Active,
        TaskStatusInternal::QaAsistenmu => TaskBucket::Qa,
        TaskStatusInternal::Revision => TaskBucket::ClientReview,
        TaskStatusInternal::Done => TaskBucket::Completed,
    }
}

/// Classifies raw status text. Unrecognized values land in `NewTasks`.
pub fn classify_raw(raw: &str) -> TaskBucket {
    match normalize_tag(raw).as_str() {
        "IN_PROGRESS" => TaskBucket::Active,
        "QA_ASISTENMU" => TaskBucket::Qa,
        "REVISION" => TaskBucket::ClientReview,
        "DONE" => TaskBucket::Completed,
        _ => TaskBucket::NewTasks,
    }
}

pub fn classify_task(task: &TaskRecord) -> TaskBucket {
    classify(task.status_internal)
}

/// Tasks split by tab. Every input task lands in exactly one bucket, and
/// input order is kept inside each bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskBuckets {
    pub new_tasks: Vec<TaskRecord>,
    pub active: Vec<TaskRecord>,
    pub qa: Vec<TaskRecord>,
    pub client_review: Vec<TaskRecord>,
    pub completed: Vec<TaskRecord>,
}

impl TaskBuckets {
    pub fn get(&self, bucket: TaskBucket) -> &[TaskRecord] {
        match bucket {
            TaskBucket::NewTasks => &self.new_tasks,
            TaskBucket::Active => &self.active,
            TaskBucket::Qa => &self.qa,
            TaskBucket::ClientReview => &self.client_review,
            TaskBucket::Completed => &self.completed,
        }
    }

    fn get_mut(&mut self, bucket: TaskBucket) -> &mut Vec<TaskRecord> {
        match bucket {
            TaskBucket::NewTasks => &mut self.new_tasks,
            TaskBucket::Active => &mut self.active,
            TaskBucket::Qa => &mut self.qa,
            TaskBucket::ClientReview => &mut self.client_review,
            TaskBucket::Completed => &mut self.completed,
        }
    }

    /// Badge counts, in tab order.
    pub fn counts(&self) -> [(TaskBucket, usize); 5] {
        TaskBucket::ALL.map(|bucket| (bucket, self.get(bucket).len()))
    }

    pub fn total(&self) -> usize {
        TaskBucket::ALL.iter().map(|bucket| self.get(*bucket).len()).sum()
    }
}

pub fn partition<I>(tasks: I) -> TaskBuckets
where
    I: IntoIterator<Item = TaskRecord>,
{
    let mut buckets = TaskBuckets::default();
    for task in tasks {
        buckets.get_mut(classify_task(&task)).push(task);
    }
    buckets
}

/// The staff task board: buckets with the active tab priority-sorted.
pub fn task_board<I>(tasks: I) -> TaskBuckets
where
    I: IntoIterator<Item = TaskRecord>,
{
    let mut buckets = partition(tasks);
    sort_by_priority(&mut buckets.active);
    buckets
}
