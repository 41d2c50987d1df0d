pub mod format;
pub mod label;
pub mod summary;
pub mod types;

pub use format::format_time;
pub use label::Label;
pub use summary::OutlineSummary;
pub use types::{RegionId, ReportMode};
