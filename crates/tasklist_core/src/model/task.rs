use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned task identifier. The service may hand out numbers or
/// strings; whichever form it used is sent back unchanged. Numbers keep their
/// JSON form, so `1.5` or ids beyond `i64` survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(serde_json::Number),
    Text(String),
}

impl TaskId {
    /// Interpret user input as an id. Input that reads back as the same JSON
    /// number becomes `Number`, everything else is kept as text.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        match trimmed.parse::<serde_json::Number>() {
            Ok(number) if number.to_string() == trimmed => Some(Self::Number(number)),
            _ => Some(Self::Text(trimmed.to_string())),
        }
    }

    /// Matches user input against this id using its display form, so
    /// `"7"` finds both `7` and `"7"`.
    pub fn matches(&self, raw: &str) -> bool {
        self.to_string() == raw.trim()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Unsaved task input. Serializes to the body of `POST /tasks`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DraftTask {
    pub title: String,
    pub description: String,
}

impl DraftTask {
    pub fn new<T: Into<String>, D: Into<String>>(title: T, description: D) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}
