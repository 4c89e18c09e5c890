use crate::model::user_data::UserData;
use anyhow::Result;

/// Where the surrounding application keeps its state between runs. Loaded
/// once at startup, saved once per change or on exit.
pub trait UserDataRepository {
    fn load(&self) -> Result<UserData>;
    fn save(&self, data: &UserData) -> Result<()>;
}
