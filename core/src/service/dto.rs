use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::task::{Partition, Priority, Task, TaskId};
use crate::service::expiry::ExpiryPolicy;

/// Flattened, display-ready view of a task for whatever draws the lists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskView {
    pub id: TaskId,
    pub description: String,
    pub due: String,
    pub priority: Priority,
    pub status: String, // "upcoming" | "completed"
    pub completed_at: Option<NaiveDateTime>,
    pub purge_at: Option<NaiveDateTime>,
}

impl TaskView {
    pub fn from_task(task: &Task, partition: Partition, policy: &ExpiryPolicy) -> Self {
        let purge_at = match partition {
            Partition::Completed => policy.expires_at(task).ok(),
            Partition::Upcoming => None,
        };

        Self {
            id: task.id,
            description: task.description.clone(),
            due: task.due_label(),
            priority: task.priority,
            status: partition.to_string(),
            completed_at: task.completed_at,
            purge_at,
        }
    }
}
