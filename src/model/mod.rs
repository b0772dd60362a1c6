pub mod types;

pub use types::{Event, Mark, Meet, PerformanceRecord, Round};
