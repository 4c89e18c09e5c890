use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::{InvariantViolation, TaskNotFound};
use crate::model::task::{Partition, Task, TaskId};
use crate::model::user_data::UserData;

/// In-memory home of every live task, split into upcoming and completed.
///
/// Both partitions keep insertion order: creation order for upcoming,
/// completion order for completed. The store owns the id high-water mark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    largest_id: u64,
    upcoming: Vec<Task>,
    completed: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from saved user data, repairing what can be repaired.
    pub fn from_user_data(data: &UserData) -> Result<Self, InvariantViolation> {
        let mut seen = HashSet::new();
        for task in data.upcoming.iter().chain(&data.completed) {
            if !seen.insert(task.id) {
                return Err(InvariantViolation(format!(
                    "task id {} appears more than once",
                    task.id
                )));
            }
        }

        let max_id = seen.iter().map(|id| id.0).max().unwrap_or(0);
        let largest_id = if data.largest_id < max_id {
            warn!(
                largest_id = data.largest_id,
                max_id, "saved id high-water mark is behind existing tasks; raising it"
            );
            max_id
        } else {
            data.largest_id
        };

        let mut upcoming = data.upcoming.clone();
        for task in upcoming.iter_mut().filter(|t| t.completed_at.is_some()) {
            warn!(id = %task.id, "upcoming task carried a completion time; clearing it");
            task.completed_at = None;
        }

        Ok(Self {
            largest_id,
            upcoming,
            completed: data.completed.clone(),
        })
    }

    /// Writes the store back into `data`, leaving keys it does not own alone.
    pub fn write_into(&self, data: &mut UserData) {
        data.largest_id = self.largest_id;
        data.upcoming = self.upcoming.clone();
        data.completed = self.completed.clone();
    }

    pub fn to_user_data(&self) -> UserData {
        let mut data = UserData::default();
        self.write_into(&mut data);
        data
    }

    pub fn largest_id(&self) -> u64 {
        self.largest_id
    }

    /// Issues an id above every id this store has ever issued. Fails once
    /// the id space is used up; the mark is left untouched then.
    pub fn next_id(&mut self) -> Result<TaskId, InvariantViolation> {
        self.largest_id = self.largest_id.checked_add(1).ok_or_else(|| {
            InvariantViolation(format!("task ids exhausted at {}", self.largest_id))
        })?;
        Ok(TaskId(self.largest_id))
    }

    pub fn add_upcoming(&mut self, task: Task) -> Result<(), InvariantViolation> {
        if task.id.0 == 0 || task.id.0 > self.largest_id {
            return Err(InvariantViolation(format!(
                "task id {} was not issued by this store",
                task.id
            )));
        }
        if self.contains(task.id) {
            return Err(InvariantViolation(format!("task id {} is already in use", task.id)));
        }
        if task.completed_at.is_some() {
            return Err(InvariantViolation(format!(
                "new task {} already has a completion time",
                task.id
            )));
        }
        debug!(id = %task.id, due_at = %task.due_label(), "task added");
        self.upcoming.push(task);
        Ok(())
    }

    pub fn complete(&mut self, id: TaskId, now: NaiveDateTime) -> Result<Task, TaskNotFound> {
        let mut task = take(&mut self.upcoming, id, Partition::Upcoming)?;
        task.completed_at = Some(now);
        self.completed.push(task.clone());
        debug!(id = %id, "task completed");
        Ok(task)
    }

    pub fn reopen(&mut self, id: TaskId) -> Result<Task, TaskNotFound> {
        let mut task = take(&mut self.completed, id, Partition::Completed)?;
        task.completed_at = None;
        self.upcoming.push(task.clone());
        debug!(id = %id, "task reopened");
        Ok(task)
    }

    /// Drops a completed task for good. Only purge passes call this.
    pub fn remove_completed(&mut self, id: TaskId) -> Option<Task> {
        take(&mut self.completed, id, Partition::Completed).ok()
    }

    pub fn upcoming(&self) -> &[Task] {
        &self.upcoming
    }

    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    pub fn list_upcoming(&self) -> Vec<Task> {
        self.upcoming.clone()
    }

    pub fn list_completed(&self) -> Vec<Task> {
        self.completed.clone()
    }

    fn contains(&self, id: TaskId) -> bool {
        self.upcoming.iter().chain(&self.completed).any(|t| t.id == id)
    }
}

fn take(tasks: &mut Vec<Task>, id: TaskId, partition: Partition) -> Result<Task, TaskNotFound> {
    let pos = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or(TaskNotFound { id, partition })?;
    Ok(tasks.remove(pos))
}
