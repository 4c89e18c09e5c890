use chrono::NaiveDateTime;
use tracing::{error, info};

use crate::error::{AddTaskError, InvariantViolation, TaskNotFound};
use crate::model::task::{Partition, Task, TaskId};
use crate::model::user_data::UserData;
use crate::service::dto::TaskView;
use crate::service::expiry::ExpiryPolicy;
use crate::store::TaskStore;
use crate::time::parse_due_time;

/// The operations the presentation layer drives: add, complete, reopen,
/// remove, list and purge.
#[derive(Debug, Clone, Default)]
pub struct TaskLifecycleService {
    store: TaskStore,
    expiry: ExpiryPolicy,
}

impl TaskLifecycleService {
    pub fn new(store: TaskStore, expiry: ExpiryPolicy) -> Self {
        Self { store, expiry }
    }

    pub fn from_user_data(data: &UserData, expiry: ExpiryPolicy) -> Result<Self, InvariantViolation> {
        Ok(Self::new(TaskStore::from_user_data(data)?, expiry))
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn expiry(&self) -> &ExpiryPolicy {
        &self.expiry
    }

    /// Creates a task in the upcoming list.
    ///
    /// Returns `Ok(None)` when both fields are empty: the user submitted
    /// nothing and nothing happens.
    pub fn add_task(
        &mut self,
        description: &str,
        raw_due_text: &str,
        now: NaiveDateTime,
    ) -> Result<Option<Task>, AddTaskError> {
        let raw_due_text = raw_due_text.trim();

        match (description.trim().is_empty(), raw_due_text.is_empty()) {
            (true, true) => return Ok(None),
            (true, false) => return Err(AddTaskError::MissingDescription),
            _ => {}
        }

        let due_at = parse_due_time(Some(raw_due_text), now)?;
        let id = self.store.next_id().inspect_err(|violation| {
            error!(%violation, "could not issue a task id");
        })?;
        let task = Task::new(id, description.to_string(), due_at);

        self.store.add_upcoming(task.clone()).inspect_err(|violation| {
            error!(%violation, "store rejected a freshly issued task");
        })?;
        Ok(Some(task))
    }

    pub fn complete_task(&mut self, id: TaskId, now: NaiveDateTime) -> Result<Task, TaskNotFound> {
        self.store.complete(id, now)
    }

    pub fn reopen_task(&mut self, id: TaskId) -> Result<Task, TaskNotFound> {
        self.store.reopen(id)
    }

    /// "Removing" a completed task puts it back on the upcoming list; only
    /// expiry deletes tasks.
    pub fn remove_task(&mut self, id: TaskId) -> Result<Task, TaskNotFound> {
        self.store.reopen(id)
    }

    pub fn reassign_on_removal(&mut self, task: &Task) -> Result<Task, TaskNotFound> {
        self.remove_task(task.id)
    }

    pub fn list_upcoming(&self) -> Vec<Task> {
        self.store.list_upcoming()
    }

    pub fn list_completed(&self) -> Vec<Task> {
        self.store.list_completed()
    }

    /// Permanently drops completed tasks whose retention has run out and
    /// returns them. A task that breaks the completed-task invariant is
    /// logged and left in place.
    pub fn purge_expired(&mut self, now: NaiveDateTime) -> Vec<Task> {
        let mut doomed = Vec::new();
        for task in self.store.completed() {
            match self.expiry.is_expired(task, now) {
                Ok(true) => doomed.push(task.id),
                Ok(false) => {}
                Err(violation) => error!(id = %task.id, %violation, "skipping task during purge"),
            }
        }
        self.remove_purged(doomed)
    }

    /// Strict purge for development builds: any broken completed task fails
    /// the whole pass and nothing is removed.
    pub fn try_purge_expired(&mut self, now: NaiveDateTime) -> Result<Vec<Task>, InvariantViolation> {
        let doomed: Vec<TaskId> = self
            .expiry
            .expired(self.store.completed(), now)?
            .iter()
            .map(|t| t.id)
            .collect();
        Ok(self.remove_purged(doomed))
    }

    fn remove_purged(&mut self, doomed: Vec<TaskId>) -> Vec<Task> {
        let purged: Vec<Task> = doomed
            .into_iter()
            .filter_map(|id| self.store.remove_completed(id))
            .collect();

        if !purged.is_empty() {
            let ids: Vec<u64> = purged.iter().map(|t| t.id.0).collect();
            info!(count = purged.len(), ?ids, "purged expired completed tasks");
        }
        purged
    }

    /// Purge first, then list: what a completed-task view should show.
    pub fn visible_completed(&mut self, now: NaiveDateTime) -> Vec<Task> {
        self.purge_expired(now);
        self.list_completed()
    }

    pub fn upcoming_views(&self) -> Vec<TaskView> {
        self.store
            .upcoming()
            .iter()
            .map(|t| TaskView::from_task(t, Partition::Upcoming, &self.expiry))
            .collect()
    }

    pub fn completed_views(&mut self, now: NaiveDateTime) -> Vec<TaskView> {
        self.purge_expired(now);
        self.store
            .completed()
            .iter()
            .map(|t| TaskView::from_task(t, Partition::Completed, &self.expiry))
            .collect()
    }

    pub fn write_into(&self, data: &mut UserData) {
        self.store.write_into(data);
    }
}
