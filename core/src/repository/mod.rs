pub mod file;
pub mod traits;

// Re-export
pub use file::{default_data_dir, FileUserDataRepository};
pub use traits::UserDataRepository;
