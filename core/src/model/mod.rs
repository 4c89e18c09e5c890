pub mod task;
pub mod user_data;
