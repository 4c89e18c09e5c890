pub mod dto;
pub mod expiry;
pub mod task_service;

#[cfg(test)]
mod lifecycle_test;
