pub mod calculations;
pub mod models;
pub mod store;

pub use calculations::{ComputationError, ScheduleError};
pub use models::*;
pub use store::{RepositoryError, ScheduleRepository, ScheduleSnapshot};
