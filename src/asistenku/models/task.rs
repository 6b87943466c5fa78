// src/asistenku/models/task.rs
use crate::error::AsistenkuError;
use crate::models::common::{PrincipalId, TaskId, TimestampNs};
use crate::utils::guards::normalize_tag;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash, Copy, Default)]
pub enum RequestType {
    #[default]
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "PRIORITY")]
    Priority,
    #[serde(rename = "URGENT")]
    Urgent,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Normal => "NORMAL",
            RequestType::Priority => "PRIORITY",
            RequestType::Urgent => "URGENT",
        }
    }

    /// Sort weight, higher first.
    pub fn weight(&self) -> u8 {
        match self {
            RequestType::Urgent => 3,
            RequestType::Priority => 2,
            RequestType::Normal => 1,
        }
    }

    /// Text of the badge shown next to a task.
    pub fn badge(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = AsistenkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_tag(s).as_str() {
            "NORMAL" => Ok(RequestType::Normal),
            "PRIORITY" => Ok(RequestType::Priority),
            "URGENT" => Ok(RequestType::Urgent),
            _ => Err(AsistenkuError::Decode(format!("unknown request type {:?}", s))),
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash, Copy)]
pub enum TaskStatusInternal {
    #[serde(rename = "REQUESTED")]
    Requested,
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "QA_ASISTENMU")]
    QaAsistenmu,
    #[serde(rename = "REVISION")]
    Revision,
    #[serde(rename = "DONE")]
    Done,
}

impl TaskStatusInternal {
    pub const ALL: [TaskStatusInternal; 5] = [
        TaskStatusInternal::Requested,
        TaskStatusInternal::InProgress,
        TaskStatusInternal::QaAsistenmu,
        TaskStatusInternal::Revision,
        TaskStatusInternal::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatusInternal::Requested => "REQUESTED",
            TaskStatusInternal::InProgress => "IN_PROGRESS",
            TaskStatusInternal::QaAsistenmu => "QA_ASISTENMU",
            TaskStatusInternal::Revision => "REVISION",
            TaskStatusInternal::Done => "DONE",
        }
    }

    /// Parses a backend tag, mapping anything unrecognized to `Requested`.
    pub fn from_tag_lossy(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            log_warn!("Unrecognized task status {:?}, treating as REQUESTED", raw);
            TaskStatusInternal::Requested
        })
    }
}

impl fmt::Display for TaskStatusInternal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatusInternal {
    type Err = AsistenkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_tag(s);
        TaskStatusInternal::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| AsistenkuError::Decode(format!("unknown task status {:?}", s)))
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TaskRecord {
    pub task_id: TaskId,
    pub client_id: PrincipalId,
    pub title: String,
    pub description: String,
    pub request_type: RequestType,
    pub status_internal: TaskStatusInternal,
    pub client_deadline: Option<TimestampNs>,
    pub internal_deadline: Option<TimestampNs>,
    pub assigned_partner_id: Option<PrincipalId>,
    pub assigned_asistenmu_name: Option<String>,
    pub created_at: TimestampNs,
    pub updated_at: TimestampNs,
}

impl TaskRecord {
    /// Client deadline when set, the internal one otherwise.
    pub fn effective_deadline(&self) -> Option<TimestampNs> {
        self.client_deadline.or(self.internal_deadline)
    }

    pub fn is_done(&self) -> bool {
        self.status_internal == TaskStatusInternal::Done
    }
}

/// A client's service request, as submitted from the request form.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(max = 4000))]
    pub description: String,
    #[serde(rename = "requestType")]
    pub request_type: RequestType,
    #[serde(rename = "clientDeadline")]
    pub client_deadline: Option<TimestampNs>,
}

impl TaskInput {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        request_type: RequestType,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            request_type,
            client_deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: TimestampNs) -> Self {
        self.client_deadline = Some(deadline);
        self
    }
}
