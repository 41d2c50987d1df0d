use thiserror::Error;

use calltree_protocol::RegionId;

#[derive(Debug, Error)]
pub enum TimingError {
    /// A close named a region other than the one currently open.
    #[error(
        "close of `{found}` ({found_id}) does not match the open region `{expected}` ({expected_id})"
    )]
    UnbalancedClose {
        expected: String,
        expected_id: RegionId,
        found: String,
        found_id: RegionId,
    },
    /// A close arrived while no region was open.
    #[error("close of `{0}` with no region open")]
    NothingOpen(String),
    /// The node's timer was never started.
    #[error("timer for `{0}` is not running")]
    NotRunning(String),
    #[error("clock read failed: {0}")]
    Clock(#[from] std::io::Error),
}
