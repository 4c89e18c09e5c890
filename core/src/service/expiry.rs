use chrono::{Duration, NaiveDateTime};

use crate::error::InvariantViolation;
use crate::model::task::Task;

pub const DEFAULT_RETENTION_HOURS: i64 = 24;

/// Decides when a completed task has been kept long enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    retention: Duration,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_RETENTION_HOURS))
    }
}

impl ExpiryPolicy {
    pub fn new(retention: Duration) -> Self {
        Self { retention }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// The moment `task` becomes eligible for purging.
    pub fn expires_at(&self, task: &Task) -> Result<NaiveDateTime, InvariantViolation> {
        let completed_at = task.completed_at.ok_or_else(|| {
            InvariantViolation(format!("completed task {} has no completion time", task.id))
        })?;
        completed_at.checked_add_signed(self.retention).ok_or_else(|| {
            InvariantViolation(format!("expiry of task {} overflows the calendar", task.id))
        })
    }

    pub fn is_expired(&self, task: &Task, now: NaiveDateTime) -> Result<bool, InvariantViolation> {
        Ok(now >= self.expires_at(task)?)
    }

    /// Every task in `tasks` whose retention window has run out. Fails on the
    /// first task without a completion time.
    pub fn expired<'a>(
        &self,
        tasks: &'a [Task],
        now: NaiveDateTime,
    ) -> Result<Vec<&'a Task>, InvariantViolation> {
        let mut expired = Vec::new();
        for task in tasks {
            if self.is_expired(task, now)? {
                expired.push(task);
            }
        }
        Ok(expired)
    }
}
