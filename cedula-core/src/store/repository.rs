use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::calculations::ScheduleError;
use crate::models::FeeSchedule;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("fee schedule '{0}' not found")]
    NotFound(String),

    #[error("fee schedule rejected: {0}")]
    Invalid(#[from] ScheduleError),
}

/// An immutable, versioned copy of a published fee schedule.
///
/// Computations hold on to a snapshot for their whole duration, so an
/// administrator publishing a new version never changes a computation that
/// is already in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSnapshot {
    pub name: String,
    /// Starts at 1 and increases with every change to the named schedule.
    pub version: u64,
    pub published_at: DateTime<Utc>,
    pub schedule: Arc<FeeSchedule>,
}

/// Source of fee schedules for the computation engine.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Validates `schedule` and stores it under `name`, replacing any
    /// previous version.
    async fn publish(
        &self,
        name: &str,
        schedule: FeeSchedule,
    ) -> Result<ScheduleSnapshot, RepositoryError>;

    /// Returns the current version of the named schedule.
    async fn snapshot(&self, name: &str) -> Result<ScheduleSnapshot, RepositoryError>;

    /// Switches the named schedule on or off, publishing a new version.
    async fn set_active(
        &self,
        name: &str,
        active: bool,
    ) -> Result<ScheduleSnapshot, RepositoryError>;

    /// Names of every stored schedule, sorted alphabetically.
    async fn list_names(&self) -> Result<Vec<String>, RepositoryError>;

    async fn remove(&self, name: &str) -> Result<(), RepositoryError>;
}
