//! Wire protocol between the UI and the worker
//!
//! Inbound, the caller sends a [`TaskMessage`]: a task type tag, an opaque
//! request id and a task-specific `data` payload. Outbound, the worker
//! answers each request with zero or more [`ProgressMessage`]s followed by
//! exactly one terminal [`ResultMessage`]. Only result messages carry a
//! `success` member, which is how callers tell the two apart.
//!
//! ```json
//! {"type": "SORT_ITEMS", "id": "req-7", "data": {"items": [], "sortBy": "date"}}
//! {"id": "req-7", "success": true, "data": []}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of task kinds the engine knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    ProcessSearchResults,
    FilterItems,
    SortItems,
    ProcessCollectionData,
    CalculateStatistics,
    ParseLargeJson,
    ProcessGeometry,
}

impl TaskType {
    pub const ALL: [TaskType; 7] = [
        TaskType::ProcessSearchResults,
        TaskType::FilterItems,
        TaskType::SortItems,
        TaskType::ProcessCollectionData,
        TaskType::CalculateStatistics,
        TaskType::ParseLargeJson,
        TaskType::ProcessGeometry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::ProcessSearchResults => "PROCESS_SEARCH_RESULTS",
            TaskType::FilterItems => "FILTER_ITEMS",
            TaskType::SortItems => "SORT_ITEMS",
            TaskType::ProcessCollectionData => "PROCESS_COLLECTION_DATA",
            TaskType::CalculateStatistics => "CALCULATE_STATISTICS",
            TaskType::ParseLargeJson => "PARSE_LARGE_JSON",
            TaskType::ProcessGeometry => "PROCESS_GEOMETRY",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown task type: {0}")]
pub struct UnknownTaskType(pub String);

impl FromStr for TaskType {
    type Err = UnknownTaskType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskType::ALL
            .into_iter()
            .find(|task_type| task_type.as_str() == s)
            .ok_or_else(|| UnknownTaskType(s.to_string()))
    }
}

/// Caller-generated correlation id, echoed back verbatim.
///
/// The engine neither generates nor checks uniqueness of ids. Integers and
/// strings get their own variants; anything else (fractions, integers
/// beyond `i64`, `null`, objects) is carried as the raw JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    Text(String),
    Other(Value),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Text(s) => f.write_str(s),
            RequestId::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::Text(value.to_string())
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        RequestId::Text(value)
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        RequestId::Number(value)
    }
}

/// Inbound request. `task_type` stays a raw string on the wire so that an
/// unrecognized tag still reaches the router and gets a proper error reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMessage {
    #[serde(rename = "type")]
    pub task_type: String,
    pub id: RequestId,
    #[serde(default)]
    pub data: Value,
}

impl TaskMessage {
    pub fn new(task_type: TaskType, id: impl Into<RequestId>, data: Value) -> Self {
        Self {
            task_type: task_type.as_str().to_string(),
            id: id.into(),
            data,
        }
    }
}

/// Terminal reply: `{id, success: true, data}` or `{id, success: false, error}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMessage {
    pub id: RequestId,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultMessage {
    pub fn success(id: RequestId, data: Value) -> Self {
        Self {
            id,
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(id: RequestId, error: impl Into<String>) -> Self {
        Self {
            id,
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Non-terminal progress signal, 0-100
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMessage {
    pub id: RequestId,
    pub progress: u8,
}

/// Anything the worker sends back to its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Result(ResultMessage),
    Progress(ProgressMessage),
}

impl OutboundMessage {
    pub fn id(&self) -> &RequestId {
        match self {
            OutboundMessage::Result(result) => &result.id,
            OutboundMessage::Progress(progress) => &progress.id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OutboundMessage::Result(_))
    }
}

impl From<ResultMessage> for OutboundMessage {
    fn from(message: ResultMessage) -> Self {
        OutboundMessage::Result(message)
    }
}

impl From<ProgressMessage> for OutboundMessage {
    fn from(message: ProgressMessage) -> Self {
        OutboundMessage::Progress(message)
    }
}
