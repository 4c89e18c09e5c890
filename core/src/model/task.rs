use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Task identifier handed out by `TaskStore::next_id`. Never reused.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// The two live partitions of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Upcoming,
    Completed,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Upcoming => f.write_str("upcoming"),
            Partition::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    #[serde(alias = "subject")]
    pub description: String,
    #[serde(with = "due_format", alias = "time")]
    pub due_at: NaiveDateTime,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
}

impl Task {
    pub fn new(id: TaskId, description: String, due_at: NaiveDateTime) -> Self {
        Self {
            id,
            description,
            due_at,
            priority: Priority::default(),
            completed_at: None,
        }
    }

    pub fn due_label(&self) -> String {
        self.due_at.format(due_format::FORMAT).to_string()
    }
}

/// Due times are stored the way users read them: `2024-01-01 23:59`.
pub mod due_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(due: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&due.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
