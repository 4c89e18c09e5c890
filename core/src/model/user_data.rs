use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::task::Task;

/// The whole saved state of the application, as loaded at startup and
/// written back on exit.
///
/// Keys the engine does not own (the theme palette, for one) are kept in
/// `extra` so a save never drops them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UserData {
    #[serde(default)]
    pub largest_id: u64,
    #[serde(default)]
    pub upcoming: Vec<Task>,
    #[serde(default)]
    pub completed: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
