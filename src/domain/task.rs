//! Task domain model
//!
//! Tasks are the units of work whose priorities the engine maintains.
//! They can depend on other tasks; a dependency on an ID that is not in
//! the current task set is kept on the record but ignored by the graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::TaskId;

/// Priority given to tasks created without an explicit one
pub const DEFAULT_PRIORITY: u32 = 500;

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(alias = "in_progress")]
    InProgress,
    Testing,
    Done,
    Blocked,
    Error,
}

impl TaskStatus {
    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    /// Returns true if this task is currently being worked on
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::InProgress)
    }

    /// Returns true if this task is waiting on something outside the graph
    pub fn is_blocked(&self) -> bool {
        matches!(self, TaskStatus::Blocked)
    }

    /// Returns the serialized name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "inprogress",
            TaskStatus::Testing => "testing",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Error => "error",
        }
    }
}

/// A prioritized task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Human-readable title
    pub title: String,

    /// Longer free-form description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Numeric priority, higher is more urgent
    #[serde(default = "default_priority")]
    pub priority: u32,

    /// IDs of tasks that must be done before this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<TaskId>,

    /// When the task was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the task was last updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Number of subtasks
    #[serde(default, skip_serializing_if = "is_zero")]
    pub subtask_count: u32,

    /// Number of files the task touches
    #[serde(default, skip_serializing_if = "is_zero")]
    pub related_file_count: u32,
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

fn is_zero(val: &u32) -> bool {
    *val == 0
}

impl Task {
    /// Creates a new todo task with the default priority
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: DEFAULT_PRIORITY,
            depends_on: Vec::new(),
            created_at: Some(now),
            updated_at: Some(now),
            subtask_count: 0,
            related_file_count: 0,
        }
    }

    /// Returns true if the task is done
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// Adds a dependency on another task, ignoring duplicates and self-references
    pub fn add_dependency(&mut self, task_id: TaskId) {
        if task_id != self.id && !self.depends_on.contains(&task_id) {
            self.depends_on.push(task_id);
        }
    }

    /// Removes a dependency
    pub fn remove_dependency(&mut self, task_id: &TaskId) -> bool {
        let len_before = self.depends_on.len();
        self.depends_on.retain(|id| id != task_id);
        self.depends_on.len() != len_before
    }

    /// Sets the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Title and description joined and lowercased, for keyword heuristics
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }

    /// Whole days elapsed since creation, if known
    pub fn days_since_created(&self, now: DateTime<Utc>) -> Option<i64> {
        self.created_at.map(|t| (now - t).num_days().max(0))
    }

    /// Whole days elapsed since the last update, falling back to creation
    pub fn days_since_updated(&self, now: DateTime<Utc>) -> Option<i64> {
        self.updated_at
            .or(self.created_at)
            .map(|t| (now - t).num_days().max(0))
    }
}
