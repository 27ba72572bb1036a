//! Application layer logic for taskdeck.
//!
//! This crate provides high-level services, caching, configuration, and utilities
//! shared across the CLI and TUI interfaces.

pub mod config;
pub mod filter_util;
pub mod service;
pub mod store;
pub mod task_cache;
pub mod task_patch;
pub mod task_repository;

// Re-exports for convenience
pub use config::{AppConfig, BackendConfig, DefaultsConfig};
pub use filter_util::{
    FilterBuildError, FilterBuildResult, TaskFilterBuilder, parse_due_date, parse_priority_token,
};
pub use service::{CreateCategoryInput, CreateTaskInput, TaskService};
pub use store::RecordStore;
pub use task_cache::TaskCache;
pub use task_patch::{CategoryPatch, DueDatePatch, TaskPatch};
pub use task_repository::TaskRepository;
