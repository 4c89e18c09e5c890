pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;
pub mod time;

pub use error::{AddTaskError, InvalidDueTime, InvariantViolation, TaskNotFound};
pub use model::task::{Partition, Priority, Task, TaskId};
pub use model::user_data::UserData;
pub use repository::{FileUserDataRepository, UserDataRepository};
pub use service::dto::TaskView;
pub use service::expiry::{ExpiryPolicy, DEFAULT_RETENTION_HOURS};
pub use service::task_service::TaskLifecycleService;
pub use store::TaskStore;
pub use time::parse_due_time;
