//! Reference collaborators for Steward: stores, repositories, configuration
//! and logging.

pub mod async_dir_exception_log_repository;
pub mod config_service;
pub mod logging;
pub mod memory_activity_repository;
pub mod memory_entity_store;
pub mod memory_exception_log_repository;
pub mod paths;

pub use crate::async_dir_exception_log_repository::AsyncDirExceptionLogRepository;
pub use crate::config_service::ConfigService;
pub use crate::memory_activity_repository::InMemoryActivityRepository;
pub use crate::memory_entity_store::{AuditAction, AuditTrailEntry, InMemoryEntityStore};
pub use crate::memory_exception_log_repository::InMemoryExceptionLogRepository;
