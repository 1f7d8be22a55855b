pub mod amount;
pub mod batch;
pub mod declarations;
pub mod loader;

pub use amount::{ParseAmountError, ParseFlagError, parse_amount, parse_flag};
pub use batch::{BatchOutcome, compute_batch, write_results};
pub use declarations::{DeclarationLoadError, DeclarationRow};
pub use loader::{BracketRecord, ScheduleLoader, ScheduleLoaderError};
