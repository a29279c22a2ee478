use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;

/// Format of `Task::datetime`: the first 16 characters of an ISO-8601 UTC timestamp.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub datetime: String,
    #[serde(default)]
    pub completed: bool,
}

/// Fields a caller may change on an existing task. `id`, `datetime` and `completed`
/// have no representation here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: Some(description.into()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
}

impl std::fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskValidationError::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl std::error::Error for TaskValidationError {}

/// Input collected by a "new note" form before it becomes a [`Task`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn build(self) -> Result<Task, TaskValidationError> {
        self.into_task(Utc::now())
    }

    /// Stamps `id` (Unix milliseconds) and `datetime` from `now`. Only an empty title is
    /// rejected; whitespace is kept as typed.
    pub fn into_task(self, now: DateTime<Utc>) -> Result<Task, TaskValidationError> {
        if self.title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(Task {
            id: now.timestamp_millis(),
            title: self.title,
            description: self.description,
            datetime: now.format(DATETIME_FORMAT).to_string(),
            completed: false,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Value of the single filter/sort select. Unknown values are kept verbatim and
/// behave like `All`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Completed,
    Incomplete,
    Datetime,
    Alphabetical,
    Other(String),
}

impl FilterMode {
    pub fn parse(value: &str) -> Self {
        match value {
            "ALL" => FilterMode::All,
            "Completed" => FilterMode::Completed,
            "Incomplete" => FilterMode::Incomplete,
            "Datetime" => FilterMode::Datetime,
            "Alphabetical" => FilterMode::Alphabetical,
            other => FilterMode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterMode::All => "ALL",
            FilterMode::Completed => "Completed",
            FilterMode::Incomplete => "Incomplete",
            FilterMode::Datetime => "Datetime",
            FilterMode::Alphabetical => "Alphabetical",
            FilterMode::Other(value) => value,
        }
    }
}

impl From<&str> for FilterMode {
    fn from(value: &str) -> Self {
        FilterMode::parse(value)
    }
}

impl Serialize for FilterMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(FilterMode::parse(&value))
    }
}

/// Snapshot handed to a presentation layer after each mutation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatePayload {
    pub tasks: Vec<Task>,
    pub theme: Theme,
}
