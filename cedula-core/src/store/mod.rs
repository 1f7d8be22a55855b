pub mod memory;
pub mod repository;

pub use memory::InMemoryScheduleRepository;
pub use repository::{RepositoryError, ScheduleRepository, ScheduleSnapshot};
