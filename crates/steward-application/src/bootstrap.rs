//! Wires the application services from configuration.

use crate::activity_tracker::ActivityTracker;
use crate::operation_runner::OperationRunner;
use std::sync::Arc;
use steward_core::activity::ActivityRepository;
use steward_core::config::{ExceptionLogSettings, StewardConfig};
use steward_core::error::Result;
use steward_core::exception_log::ExceptionLogRepository;
use steward_infrastructure::{
    AsyncDirExceptionLogRepository, InMemoryActivityRepository, InMemoryExceptionLogRepository,
};

/// Application services sharing one exception log.
pub struct AppServices {
    pub activity_tracker: Arc<ActivityTracker>,
    pub operation_runner: OperationRunner,
}

impl AppServices {
    /// Builds the services from `config`.
    ///
    /// Activities are kept in memory; the caller supplies a durable
    /// [`ActivityRepository`] through [`AppServices::with_activity_repository`].
    pub async fn from_config(config: &StewardConfig) -> Result<Self> {
        Self::with_activity_repository(config, Arc::new(InMemoryActivityRepository::new())).await
    }

    pub async fn with_activity_repository(
        config: &StewardConfig,
        activity_repository: Arc<dyn ActivityRepository>,
    ) -> Result<Self> {
        let exception_log = open_exception_log(&config.exception_log).await?;
        tracing::info!("[Bootstrap] Application services ready");
        Ok(Self {
            activity_tracker: Arc::new(ActivityTracker::new(
                activity_repository,
                exception_log.clone(),
            )),
            operation_runner: OperationRunner::new(exception_log),
        })
    }
}

/// Opens the exception log described by `settings`.
///
/// File-backed when a directory is configured, in-memory otherwise.
pub async fn open_exception_log(
    settings: &ExceptionLogSettings,
) -> Result<Arc<dyn ExceptionLogRepository>> {
    match &settings.directory {
        Some(directory) => {
            tracing::info!("[Bootstrap] Exception log at {:?}", directory);
            Ok(Arc::new(AsyncDirExceptionLogRepository::new(directory).await?))
        }
        None => {
            tracing::info!("[Bootstrap] Exception log in memory");
            Ok(Arc::new(InMemoryExceptionLogRepository::new()))
        }
    }
}
