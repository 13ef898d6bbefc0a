pub mod csv_export;
pub mod error;
pub mod executor;
pub mod file_batch;
pub mod option_ids;
pub mod progress_tracker;

pub use error::LookupError;
pub use executor::{LookupExecutor, LookupSettings};
pub use file_batch::{run_file_batch, BatchSummary};
pub use progress_tracker::ProgressTracker;
