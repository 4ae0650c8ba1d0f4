//! Work-item identifiers and blocker references
//!
//! Ref format:
//! - Task refs: `{task-id}` (e.g., `12`)
//! - Feature refs: `{task-id}.{feature-id}` (e.g., `12.3a`)
//!
//! Task ids are small integers; feature ids are free-form strings scoped to
//! their owning task. A blocker list may point at either granularity, so the
//! two forms share one `WorkRef` type.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RefError {
    #[error("Empty reference")]
    Empty,

    #[error("Invalid task id: expected an integer, got '{0}'")]
    BadTaskId(String),

    #[error("Invalid reference format: expected '{{task-id}}' or '{{task-id}}.{{feature-id}}', got '{0}'")]
    BadFormat(String),
}

/// Integer id of a task, unique within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub u32);

impl TaskId {
    /// Builds a feature ref scoped inside this task
    pub fn feature_ref(&self, feature_id: impl Into<String>) -> WorkRef {
        WorkRef::Feature(*self, feature_id.into())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(TaskId)
            .map_err(|_| RefError::BadTaskId(s.to_string()))
    }
}

impl From<u32> for TaskId {
    fn from(id: u32) -> Self {
        TaskId(id)
    }
}

// Legacy task files wrote ids both as numbers and as numeric strings, so the
// decoder accepts either; serialization is always numeric.
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(TaskId)
                .ok_or_else(|| serde::de::Error::custom(format!("task id out of range: {}", n))),
            serde_json::Value::String(s) => s.parse().map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "expected number or string for task id, got {}",
                other
            ))),
        }
    }
}

/// A reference from one work item to another
///
/// Either a whole task or a feature scoped inside one. Blocker lists hold
/// these; requirements reference tasks directly by `TaskId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkRef {
    /// The whole task must complete
    Task(TaskId),
    /// A specific feature within a task must complete
    Feature(TaskId, String),
}

impl WorkRef {
    /// Returns the task id this reference points into
    pub fn task_id(&self) -> TaskId {
        match self {
            WorkRef::Task(id) | WorkRef::Feature(id, _) => *id,
        }
    }

    /// Returns the feature id, if this is a feature-scoped reference
    pub fn feature_id(&self) -> Option<&str> {
        match self {
            WorkRef::Task(_) => None,
            WorkRef::Feature(_, feature_id) => Some(feature_id),
        }
    }

    /// Returns true if this reference points at a whole task
    pub fn is_task(&self) -> bool {
        matches!(self, WorkRef::Task(_))
    }
}

impl fmt::Display for WorkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkRef::Task(id) => write!(f, "{}", id),
            WorkRef::Feature(id, feature_id) => write!(f, "{}.{}", id, feature_id),
        }
    }
}

impl FromStr for WorkRef {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RefError::Empty);
        }

        match s.split_once('.') {
            None => Ok(WorkRef::Task(s.parse()?)),
            Some((task, feature)) => {
                if feature.is_empty() {
                    return Err(RefError::BadFormat(s.to_string()));
                }
                Ok(WorkRef::Feature(task.parse()?, feature.to_string()))
            }
        }
    }
}

impl Serialize for WorkRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Always serialize the canonical composite-string form
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl WorkRef {
    /// Decodes either the canonical string form or the legacy structured
    /// record `{"type": "task"|"feature", "task_id": .., "feature_id": ..}`.
    ///
    /// Legacy records sometimes stored the full composite key in
    /// `feature_id` (e.g., `"2.9"` for feature 9 of task 2); the redundant
    /// task prefix is stripped when it matches.
    fn from_value(value: &serde_json::Value) -> Result<Self, String> {
        match value {
            serde_json::Value::String(s) => s.parse().map_err(|e: RefError| e.to_string()),
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(|n| WorkRef::Task(TaskId(n)))
                .ok_or_else(|| format!("task reference out of range: {}", n)),
            serde_json::Value::Object(obj) => {
                let task_id = obj
                    .get("task_id")
                    .or_else(|| obj.get("story_id"))
                    .ok_or("reference record missing task_id")?;
                let task_id: TaskId =
                    serde_json::from_value(task_id.clone()).map_err(|e| e.to_string())?;

                let kind = obj.get("type").and_then(|v| v.as_str()).unwrap_or("task");
                match kind {
                    "task" | "story" => Ok(WorkRef::Task(task_id)),
                    "feature" => {
                        let feature_id = obj
                            .get("feature_id")
                            .and_then(|v| v.as_str())
                            .ok_or("feature reference missing feature_id")?;
                        let prefix = format!("{}.", task_id);
                        let feature_id =
                            feature_id.strip_prefix(&prefix).unwrap_or(feature_id);
                        if feature_id.is_empty() {
                            return Err("feature reference has empty feature_id".to_string());
                        }
                        Ok(WorkRef::Feature(task_id, feature_id.to_string()))
                    }
                    other => Err(format!("unknown reference type: {}", other)),
                }
            }
            other => Err(format!(
                "expected string or object for reference, got {}",
                other
            )),
        }
    }
}
